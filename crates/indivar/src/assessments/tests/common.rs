use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessments::inventory::{
    BandDescriptions, BandFloor, DomainSpec, InventoryKind, LevelBands, LikertValue, Question,
    QuestionBank, ResponseSet, Taxonomy,
};
use crate::assessments::repository::{
    AttemptProgress, ProgressRepository, RepositoryError, ResultId, ResultRepository, StoredResult,
};
use crate::assessments::service::AssessmentService;
use crate::assessments::{assessment_router, AssessmentServiceError};

pub(super) fn question(
    item_number: u32,
    domain: &str,
    facet: &str,
    reverse_scored: bool,
) -> Question {
    Question {
        item_number,
        text: format!("Sample item {item_number}"),
        domain: domain.to_string(),
        facet: facet.to_string(),
        reverse_scored,
    }
}

pub(super) fn likert(value: u8) -> LikertValue {
    LikertValue::new(value).expect("value on scale")
}

/// One item per BFI-2 facet, 15 items total, none reverse-keyed.
pub(super) fn mini_bfi2_bank() -> QuestionBank {
    let taxonomy = Taxonomy::bfi2();
    let mut questions = Vec::new();
    let mut item_number = 1;
    for spec in taxonomy.domains() {
        for facet in spec.facets {
            questions.push(question(item_number, spec.name, facet, false));
            item_number += 1;
        }
    }
    QuestionBank::new(taxonomy, questions).expect("mini bank is valid")
}

/// One item per HEXACO facet; the three Honesty-Humility items are
/// reverse-keyed so low raw answers score high.
pub(super) fn mini_hexaco_bank() -> QuestionBank {
    let taxonomy = Taxonomy::hexaco();
    let mut questions = Vec::new();
    let mut item_number = 1;
    for spec in taxonomy.domains() {
        for facet in spec.facets {
            let reverse = spec.name == "Honesty-Humility";
            questions.push(question(item_number, spec.name, facet, reverse));
            item_number += 1;
        }
    }
    QuestionBank::new(taxonomy, questions).expect("mini bank is valid")
}

/// A single-domain taxonomy for focused scoring scenarios.
pub(super) fn single_domain_bank(reverse_scored: bool) -> QuestionBank {
    let taxonomy = Taxonomy::new(
        InventoryKind::Bfi2,
        vec![DomainSpec {
            name: "Extraversion",
            facets: ["Sociability", "Assertiveness", "Energy Level"],
            descriptions: BandDescriptions {
                low: "low text",
                middle: "middle text",
                high: "high text",
            },
        }],
        LevelBands {
            high: BandFloor::exclusive(3.5),
            middle: BandFloor::inclusive(2.5),
            low_label: "low",
            middle_label: "moderate",
            high_label: "high",
        },
    )
    .expect("taxonomy is valid");

    let questions = vec![
        question(1, "Extraversion", "Sociability", reverse_scored),
        question(2, "Extraversion", "Assertiveness", reverse_scored),
        question(3, "Extraversion", "Energy Level", reverse_scored),
    ];
    QuestionBank::new(taxonomy, questions).expect("bank is valid")
}

pub(super) fn uniform_responses(bank: &QuestionBank, value: u8) -> ResponseSet {
    let mut responses = ResponseSet::new();
    for item in bank.questions() {
        responses.record(item.item_number, likert(value));
    }
    responses
}

/// Deterministic non-uniform fill cycling 1..=5 over item numbers.
pub(super) fn patterned_responses(bank: &QuestionBank) -> ResponseSet {
    let mut responses = ResponseSet::new();
    for item in bank.questions() {
        let value = (item.item_number % 5) as u8 + 1;
        responses.record(item.item_number, likert(value));
    }
    responses
}

#[derive(Default, Clone)]
pub(super) struct MemoryResults {
    pub(super) records: Arc<Mutex<Vec<StoredResult>>>,
}

impl ResultRepository for MemoryResults {
    fn insert(&self, record: StoredResult) -> Result<StoredResult, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard
            .iter()
            .any(|stored| stored.result_id == record.result_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ResultId) -> Result<Option<StoredResult>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|stored| &stored.result_id == id).cloned())
    }

    fn delete(&self, id: &ResultId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|stored| &stored.result_id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn list(&self, filter: Option<InventoryKind>) -> Result<Vec<StoredResult>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|stored| filter.map_or(true, |kind| stored.test_type == kind))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProgress {
    pub(super) entries: Arc<Mutex<HashMap<String, AttemptProgress>>>,
}

impl ProgressRepository for MemoryProgress {
    fn upsert(&self, progress: AttemptProgress) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("progress mutex poisoned");
        guard.insert(progress.test_id.clone(), progress);
        Ok(())
    }

    fn fetch(&self, test_id: &str) -> Result<Option<AttemptProgress>, RepositoryError> {
        let guard = self.entries.lock().expect("progress mutex poisoned");
        Ok(guard.get(test_id).cloned())
    }

    fn clear(&self, test_id: &str) -> Result<bool, RepositoryError> {
        let mut guard = self.entries.lock().expect("progress mutex poisoned");
        Ok(guard.remove(test_id).is_some())
    }

    fn list(&self) -> Result<Vec<AttemptProgress>, RepositoryError> {
        let guard = self.entries.lock().expect("progress mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableResults;

impl ResultRepository for UnavailableResults {
    fn insert(&self, _record: StoredResult) -> Result<StoredResult, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ResultId) -> Result<Option<StoredResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ResultId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _filter: Option<InventoryKind>) -> Result<Vec<StoredResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryResults, MemoryProgress>,
    Arc<MemoryResults>,
    Arc<MemoryProgress>,
) {
    let results = Arc::new(MemoryResults::default());
    let progress = Arc::new(MemoryProgress::default());
    let service = AssessmentService::with_builtin_banks(results.clone(), progress.clone())
        .expect("builtin banks load");
    (service, results, progress)
}

pub(super) fn assessment_router_with_service(
    service: AssessmentService<MemoryResults, MemoryProgress>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_incomplete(error: AssessmentServiceError, expected_missing: usize) {
    match error {
        AssessmentServiceError::Incomplete { missing, .. } => {
            assert_eq!(missing, expected_missing);
        }
        other => panic!("expected incomplete submission error, got {other:?}"),
    }
}
