use serde::{Deserialize, Serialize};

use super::bank::QuestionBank;
use super::domain::{InventoryKind, ResponseSet, SCALE_MAX, SCALE_MIN};

/// Summary for one domain: raw mean, percentile, band label, and the
/// configured prose, plus the per-facet breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: String,
    pub raw_score: f64,
    pub percentile: u8,
    pub level: String,
    pub description: String,
    pub facets: Vec<FacetScore>,
}

/// Summary for one facet within a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetScore {
    pub facet: String,
    pub raw_score: f64,
    pub percentile: u8,
}

/// Scores for a completed attempt, total over the inventory's taxonomy and
/// ordered by its canonical domain order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub inventory: InventoryKind,
    pub domains: Vec<DomainScore>,
}

impl ScoreReport {
    /// Ordered raw-score vector, one entry per domain in canonical order, for
    /// radar-chart consumers. Stable across attempts of the same inventory.
    pub fn chart_vector(&self) -> Vec<f64> {
        self.domains.iter().map(|score| score.raw_score).collect()
    }

    pub fn domain(&self, name: &str) -> Option<&DomainScore> {
        self.domains.iter().find(|score| score.domain == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("item {0} has no recorded response")]
    MissingResponse(u32),
    #[error("response recorded for unknown item {0}")]
    UnknownItem(u32),
}

/// Reject responses that reference items outside the bank.
pub fn validate_items(bank: &QuestionBank, responses: &ResponseSet) -> Result<(), ScoringError> {
    for (item_number, _) in responses.iter() {
        if bank.question(item_number).is_none() {
            return Err(ScoringError::UnknownItem(item_number));
        }
    }
    Ok(())
}

/// Score a completed response set against a question bank.
///
/// Pure and idempotent: identical inputs yield identical reports. The pass is
/// all-or-nothing; a missing or stray response aborts it rather than leaving
/// a partially corrupted average behind. Domain raw scores are flat means
/// over all of a domain's items (bank validation guarantees the equal-sized
/// facet partition this relies on).
pub fn score_responses(
    bank: &QuestionBank,
    responses: &ResponseSet,
) -> Result<ScoreReport, ScoringError> {
    validate_items(bank, responses)?;

    let taxonomy = bank.taxonomy();
    let mut domains = Vec::with_capacity(taxonomy.domains().len());

    for spec in taxonomy.domains() {
        let mut domain_sum = 0.0;
        let mut domain_count = 0usize;
        let mut facets = Vec::with_capacity(spec.facets.len());

        for facet in spec.facets {
            let mut facet_sum = 0.0;
            let mut facet_count = 0usize;

            for question in bank.questions() {
                if question.domain != spec.name || question.facet != facet {
                    continue;
                }
                let value = responses
                    .get(question.item_number)
                    .ok_or(ScoringError::MissingResponse(question.item_number))?;
                let effective = f64::from(value.effective(question.reverse_scored));
                facet_sum += effective;
                facet_count += 1;
            }

            // Bank validation rejects empty facets, so the mean is defined.
            let raw_score = facet_sum / facet_count as f64;
            facets.push(FacetScore {
                facet: facet.to_string(),
                raw_score,
                percentile: percentile_of(raw_score),
            });

            domain_sum += facet_sum;
            domain_count += facet_count;
        }

        let raw_score = domain_sum / domain_count as f64;
        let band = taxonomy.classify(raw_score);
        domains.push(DomainScore {
            domain: spec.name.to_string(),
            raw_score,
            percentile: percentile_of(raw_score),
            level: taxonomy.bands().label(band).to_string(),
            description: spec.descriptions.for_band(band).to_string(),
            facets,
        });
    }

    Ok(ScoreReport {
        inventory: taxonomy.inventory(),
        domains,
    })
}

/// Linear rescale of a raw mean in [min, max] onto 0..=100.
pub fn percentile_of(raw_score: f64) -> u8 {
    let min = f64::from(SCALE_MIN);
    let span = f64::from(SCALE_MAX - SCALE_MIN);
    (((raw_score - min) / span) * 100.0).round() as u8
}
