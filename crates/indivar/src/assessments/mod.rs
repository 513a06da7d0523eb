//! Personality inventory assessments: taxonomies, question banks, the
//! scoring engine, and the persistence/HTTP seams around them.

pub mod inventory;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use inventory::{
    score_responses, BankError, DomainScore, FacetScore, InventoryKind, LikertValue, Question,
    QuestionBank, ResponseSet, ScoreReport, ScoringError, Taxonomy,
};
pub use repository::{
    AttemptProgress, InventoryStats, ProgressRepository, RepositoryError, ResultId,
    ResultRepository, ResultSummaryView, ResultsData, StoredResult,
};
pub use router::assessment_router;
pub use service::{AssessmentService, AssessmentServiceError};
