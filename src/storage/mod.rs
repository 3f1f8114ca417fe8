//! Persistence layer
//!
//! Reads and writes the full record collection as a single JSON document.
//! Knows nothing about id allocation or merge rules.
//!
//! # Guarantees
//!
//! - Absent or empty medium loads as an empty collection
//! - Malformed content is a read error, never silently dropped
//! - `save` replaces the document atomically: a failed save leaves the
//!   previous document readable
//! - One medium access per call, no caching

mod codec;
mod errors;
mod json_file;
mod memory;

pub use codec::{decode, encode};
pub use errors::{StorageError, StorageErrorKind, StorageResult};
pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::record::Collection;

/// A medium holding one serialized collection.
pub trait Storage: Send + Sync {
    fn load(&self) -> StorageResult<Collection>;

    fn save(&self, collection: &Collection) -> StorageResult<()>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn load(&self) -> StorageResult<Collection> {
        (**self).load()
    }

    fn save(&self, collection: &Collection) -> StorageResult<()> {
        (**self).save(collection)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
