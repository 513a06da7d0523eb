use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::inventory::{
    score_responses, validate_items, BankError, InventoryKind, QuestionBank, ResponseSet,
    ScoringError,
};
use super::repository::{
    AttemptProgress, InventoryStats, ProgressRepository, RepositoryError, ResultId,
    ResultRepository, ResultsData, StoredResult,
};

/// Service composing the question banks, the scoring engine, and the result
/// and progress repositories.
pub struct AssessmentService<R, P> {
    banks: Vec<QuestionBank>,
    results: Arc<R>,
    progress: Arc<P>,
}

static RESULT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_result_id() -> ResultId {
    let id = RESULT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ResultId(format!("result-{id:06}"))
}

impl<R, P> AssessmentService<R, P>
where
    R: ResultRepository + 'static,
    P: ProgressRepository + 'static,
{
    pub fn new(results: Arc<R>, progress: Arc<P>, banks: Vec<QuestionBank>) -> Self {
        Self {
            banks,
            results,
            progress,
        }
    }

    /// Service over the banks shipped with the library (BFI-2 and HEXACO).
    pub fn with_builtin_banks(results: Arc<R>, progress: Arc<P>) -> Result<Self, BankError> {
        let banks = vec![QuestionBank::bfi2()?, QuestionBank::hexaco()?];
        Ok(Self::new(results, progress, banks))
    }

    pub fn bank(&self, slug: &str) -> Result<&QuestionBank, AssessmentServiceError> {
        self.banks
            .iter()
            .find(|bank| bank.inventory().slug() == slug)
            .ok_or_else(|| AssessmentServiceError::UnknownInventory(slug.to_string()))
    }

    pub fn inventories(&self) -> Vec<InventoryKind> {
        self.banks.iter().map(QuestionBank::inventory).collect()
    }

    /// Save (or overwrite) in-flight progress for an inventory.
    pub fn save_progress(
        &self,
        slug: &str,
        responses: ResponseSet,
        current_item: usize,
    ) -> Result<AttemptProgress, AssessmentServiceError> {
        let bank = self.bank(slug)?;
        validate_items(bank, &responses)?;

        let progress = AttemptProgress {
            test_id: slug.to_string(),
            responses,
            current_item,
            updated_at: Utc::now(),
        };
        self.progress.upsert(progress.clone())?;
        Ok(progress)
    }

    pub fn progress(&self, slug: &str) -> Result<Option<AttemptProgress>, AssessmentServiceError> {
        self.bank(slug)?;
        Ok(self.progress.fetch(slug)?)
    }

    /// Drop saved progress, reporting whether anything was stored.
    pub fn clear_progress(&self, slug: &str) -> Result<bool, AssessmentServiceError> {
        self.bank(slug)?;
        Ok(self.progress.clear(slug)?)
    }

    /// Score a completed attempt and persist it. All-or-nothing: incomplete
    /// response sets are rejected before scoring, and saved progress for the
    /// inventory is cleared only after the result is stored.
    pub fn submit(
        &self,
        slug: &str,
        responses: ResponseSet,
    ) -> Result<StoredResult, AssessmentServiceError> {
        let bank = self.bank(slug)?;

        let missing = bank
            .questions()
            .iter()
            .filter(|question| responses.get(question.item_number).is_none())
            .count();
        if missing > 0 {
            return Err(AssessmentServiceError::Incomplete {
                missing,
                total: bank.len(),
            });
        }

        let report = score_responses(bank, &responses)?;
        let record = StoredResult {
            result_id: next_result_id(),
            test_id: slug.to_string(),
            test_type: bank.inventory(),
            results_data: ResultsData {
                report,
                responses,
                total_questions: bank.len(),
            },
            completed_at: Utc::now(),
        };

        let stored = self.results.insert(record)?;
        self.progress.clear(slug)?;
        Ok(stored)
    }

    /// Stored results, newest first, optionally filtered by inventory.
    pub fn history(
        &self,
        filter: Option<InventoryKind>,
    ) -> Result<Vec<StoredResult>, AssessmentServiceError> {
        Ok(self.results.list(filter)?)
    }

    pub fn result(&self, id: &ResultId) -> Result<StoredResult, AssessmentServiceError> {
        let record = self.results.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn delete_result(&self, id: &ResultId) -> Result<(), AssessmentServiceError> {
        self.results.delete(id)?;
        Ok(())
    }

    /// Per-inventory completion stats, most recently taken first.
    pub fn stats(&self) -> Result<Vec<InventoryStats>, AssessmentServiceError> {
        let records = self.results.list(None)?;
        let mut stats: Vec<InventoryStats> = Vec::new();

        for record in records {
            match stats
                .iter_mut()
                .find(|entry| entry.test_type == record.test_type)
            {
                Some(entry) => {
                    entry.count += 1;
                    entry.first_taken = entry.first_taken.min(record.completed_at);
                    entry.last_taken = entry.last_taken.max(record.completed_at);
                }
                None => stats.push(InventoryStats {
                    test_type: record.test_type,
                    count: 1,
                    first_taken: record.completed_at,
                    last_taken: record.completed_at,
                }),
            }
        }

        stats.sort_by(|a, b| b.last_taken.cmp(&a.last_taken));
        Ok(stats)
    }

    /// CSV export of stored domain scores, one row per (result, domain).
    pub fn export_csv(
        &self,
        filter: Option<InventoryKind>,
    ) -> Result<String, AssessmentServiceError> {
        let records = self.results.list(filter)?;
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record([
                "result_id",
                "test_type",
                "completed_at",
                "domain",
                "raw_score",
                "percentile",
                "level",
            ])
            .map_err(export_error)?;

        for record in &records {
            let completed_at = record.completed_at.to_rfc3339();
            for domain in &record.results_data.report.domains {
                let raw_score = format!("{:.2}", domain.raw_score);
                let percentile = domain.percentile.to_string();
                writer
                    .write_record([
                        record.result_id.0.as_str(),
                        record.test_type.slug(),
                        completed_at.as_str(),
                        domain.domain.as_str(),
                        raw_score.as_str(),
                        percentile.as_str(),
                        domain.level.as_str(),
                    ])
                    .map_err(export_error)?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| AssessmentServiceError::Export(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| AssessmentServiceError::Export(err.to_string()))
    }
}

fn export_error(err: csv::Error) -> AssessmentServiceError {
    AssessmentServiceError::Export(err.to_string())
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("unknown inventory '{0}'")]
    UnknownInventory(String),
    #[error("{missing} of {total} questions are still unanswered")]
    Incomplete { missing: usize, total: usize },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("results export failed: {0}")]
    Export(String),
}
