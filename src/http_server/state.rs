//! Shared handler state

use std::sync::Arc;

use super::errors::{ApiError, ApiResult};
use crate::storage::{MemoryStorage, Storage};
use crate::store::{RecordStore, StoreResult};

/// Store type used by the HTTP layer, erased over its medium
pub type DynStore = RecordStore<Box<dyn Storage>>;

/// State shared across all handlers
#[derive(Clone)]
pub struct AppState {
    store: Arc<DynStore>,
}

impl AppState {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self::from_store(Arc::new(RecordStore::new(storage)))
    }

    pub fn from_store(store: Arc<DynStore>) -> Self {
        Self { store }
    }

    /// State over an empty in-memory medium
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    pub fn store(&self) -> &Arc<DynStore> {
        &self.store
    }

    /// Runs a store operation on the blocking pool.
    ///
    /// Store operations hold the store lock across file I/O and must not run
    /// on the async workers.
    pub async fn run<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&DynStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let outcome = tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        outcome.map_err(ApiError::from)
    }
}
