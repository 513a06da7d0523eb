use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use indivar::assessments::{
    AttemptProgress, InventoryKind, ProgressRepository, RepositoryError, ResultId,
    ResultRepository, StoredResult,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryResultRepository {
    records: Arc<Mutex<Vec<StoredResult>>>,
}

impl ResultRepository for InMemoryResultRepository {
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
pub(crate) struct InMemoryProgressRepository {
    entries: Arc<Mutex<HashMap<String, AttemptProgress>>>,
}

impl ProgressRepository for InMemoryProgressRepository {
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
