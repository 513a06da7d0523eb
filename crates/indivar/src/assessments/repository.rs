use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::inventory::{InventoryKind, ResponseSet, ScoreReport};

/// Identifier wrapper for stored assessment results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultId(pub String);

/// Payload persisted with a completed attempt. Stored verbatim; consumers
/// (charting, history views) read it back without re-deriving anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsData {
    pub report: ScoreReport,
    pub responses: ResponseSet,
    pub total_questions: usize,
}

/// One completed assessment. Records are only ever created or deleted, never
/// mutated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub result_id: ResultId,
    pub test_id: String,
    pub test_type: InventoryKind,
    pub results_data: ResultsData,
    pub completed_at: DateTime<Utc>,
}

impl StoredResult {
    /// Compact listing view: identity, timestamp, and the ordered raw-score
    /// vector consumed by radar charts.
    pub fn summary_view(&self) -> ResultSummaryView {
        ResultSummaryView {
            result_id: self.result_id.clone(),
            test_id: self.test_id.clone(),
            test_type: self.test_type,
            completed_at: self.completed_at,
            chart_vector: self.results_data.report.chart_vector(),
        }
    }
}

/// In-flight attempt state. Overwritten on every save, cleared when a
/// submission for the same inventory succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptProgress {
    pub test_id: String,
    pub responses: ResponseSet,
    pub current_item: usize,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction for completed results so the service module can be
/// exercised in isolation.
pub trait ResultRepository: Send + Sync {
    fn insert(&self, record: StoredResult) -> Result<StoredResult, RepositoryError>;
    fn fetch(&self, id: &ResultId) -> Result<Option<StoredResult>, RepositoryError>;
    fn delete(&self, id: &ResultId) -> Result<(), RepositoryError>;
    /// Stored results, newest first, optionally filtered by inventory.
    fn list(&self, filter: Option<InventoryKind>) -> Result<Vec<StoredResult>, RepositoryError>;
}

/// Storage abstraction for resumable attempt progress, keyed by inventory
/// slug with upsert semantics.
pub trait ProgressRepository: Send + Sync {
    fn upsert(&self, progress: AttemptProgress) -> Result<(), RepositoryError>;
    fn fetch(&self, test_id: &str) -> Result<Option<AttemptProgress>, RepositoryError>;
    /// Remove saved progress, reporting whether anything was stored.
    fn clear(&self, test_id: &str) -> Result<bool, RepositoryError>;
    fn list(&self) -> Result<Vec<AttemptProgress>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a stored result for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ResultSummaryView {
    pub result_id: ResultId,
    pub test_id: String,
    pub test_type: InventoryKind,
    pub completed_at: DateTime<Utc>,
    pub chart_vector: Vec<f64>,
}

/// Per-inventory aggregate for the stats summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryStats {
    pub test_type: InventoryKind,
    pub count: usize,
    pub first_taken: DateTime<Utc>,
    pub last_taken: DateTime<Utc>,
}
