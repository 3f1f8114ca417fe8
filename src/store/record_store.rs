//! The record store
//!
//! Every operation runs one load-mutate-save cycle against the medium while
//! holding the store lock: writers take it exclusively for the whole cycle,
//! readers share it. Nothing is cached between operations except the id
//! high-water mark.

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info};

use super::errors::{StoreError, StoreResult};
use crate::record::{Collection, Fields, Record};
use crate::storage::{JsonFileStorage, Storage, StorageError};

/// State reachable only through the store lock.
struct Guarded<S> {
    storage: S,
    /// Largest id ever observed or issued by this instance
    high_water: u64,
}

impl<S: Storage> Guarded<S> {
    fn load(&self) -> StoreResult<Collection> {
        self.storage.load().map_err(|e| unavailable("load", e))
    }

    fn save(&self, collection: &Collection) -> StoreResult<()> {
        self.storage.save(collection).map_err(|e| unavailable("save", e))
    }

    fn observe(&mut self, collection: &Collection) {
        if let Some(max) = collection.iter().map(Record::id).max() {
            self.high_water = self.high_water.max(max);
        }
    }
}

fn unavailable(step: &str, err: StorageError) -> StoreError {
    error!(step, code = err.code(), error = %err, "persistence failed");
    StoreError::Unavailable(err)
}

/// Serialized access to one collection medium.
///
/// Construct once at startup and share it (e.g. behind an `Arc`).
pub struct RecordStore<S: Storage> {
    inner: RwLock<Guarded<S>>,
}

impl RecordStore<JsonFileStorage> {
    /// Store backed by a JSON file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileStorage::new(path))
    }
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        debug!(medium = %storage.describe(), "record store created");
        Self {
            inner: RwLock::new(Guarded {
                storage,
                high_water: 0,
            }),
        }
    }

    // The medium is replaced atomically, so a holder that panicked cannot
    // have left a partial collection behind; recover the guard.
    fn read(&self) -> RwLockReadGuard<'_, Guarded<S>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Guarded<S>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Human-readable description of the medium
    pub fn describe(&self) -> String {
        self.read().storage.describe()
    }

    pub fn list_all(&self) -> StoreResult<Collection> {
        self.read().load()
    }

    pub fn get_by_id(&self, id: u64) -> StoreResult<Record> {
        self.read()
            .load()?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Appends a record under the next free id.
    ///
    /// The id is `max(existing ids, previously issued ids) + 1`. Any `id` key
    /// in `fields` is ignored.
    pub fn create(&self, fields: Fields) -> StoreResult<Record> {
        let mut guard = self.write();
        let mut collection = guard.load()?;
        guard.observe(&collection);

        let id = guard.high_water + 1;
        let record = Record::new(id, fields);
        collection.push(record.clone());

        guard.save(&collection)?;
        guard.high_water = id;

        info!(id, records = collection.len(), "record created");
        Ok(record)
    }

    /// Shallow-merges `fields` into the record with `id`.
    ///
    /// Storage is not written when the record does not exist.
    pub fn update(&self, id: u64, fields: Fields) -> StoreResult<Record> {
        let mut guard = self.write();
        let mut collection = guard.load()?;
        guard.observe(&collection);

        let record = collection
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        let keys: Vec<String> = fields.keys().cloned().collect();
        record.merge(fields);
        let updated = record.clone();

        guard.save(&collection)?;
        info!(id, ?keys, "record updated");
        Ok(updated)
    }

    /// Removes the record with `id` and returns it.
    pub fn delete(&self, id: u64) -> StoreResult<Record> {
        let mut guard = self.write();
        let mut collection = guard.load()?;
        guard.observe(&collection);

        let position = collection
            .iter()
            .position(|record| record.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = collection.remove(position);

        guard.save(&collection)?;
        info!(id, records = collection.len(), "record deleted");
        Ok(removed)
    }

    /// Removes every record matching `predicate` in one cycle.
    ///
    /// Returns how many were removed; nothing is written when none match.
    pub fn delete_where<F>(&self, predicate: F) -> StoreResult<usize>
    where
        F: Fn(&Record) -> bool,
    {
        let mut guard = self.write();
        let mut collection = guard.load()?;
        guard.observe(&collection);

        let before = collection.len();
        collection.retain(|record| !predicate(record));
        let removed = before - collection.len();

        if removed == 0 {
            debug!("delete_where matched nothing");
            return Ok(0);
        }

        guard.save(&collection)?;
        info!(removed, records = collection.len(), "records deleted");
        Ok(removed)
    }

    /// Records matching `predicate`, in collection order
    pub fn search<F>(&self, predicate: F) -> StoreResult<Vec<Record>>
    where
        F: Fn(&Record) -> bool,
    {
        let hits: Vec<Record> = self
            .read()
            .load()?
            .into_iter()
            .filter(|record| predicate(record))
            .collect();
        debug!(hits = hits.len(), "search finished");
        Ok(hits)
    }
}
