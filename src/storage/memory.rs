//! In-memory medium
//!
//! Holds the encoded document rather than the decoded records, so loads and
//! saves go through the same codec as the file medium.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::codec;
use super::errors::{StorageError, StorageResult};
use super::Storage;
use crate::record::Collection;

const LOCATION: &str = "<memory>";

#[derive(Default)]
pub struct MemoryStorage {
    document: Mutex<String>,
    read_only: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing raw document, valid or not
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(document.into()),
            read_only: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent save fail with a write error
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// The raw document as last saved
    pub fn document(&self) -> String {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> StorageResult<Collection> {
        let document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        codec::decode(&document).map_err(|e| StorageError::malformed(LOCATION, e))
    }

    fn save(&self, collection: &Collection) -> StorageResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StorageError::write(
                LOCATION,
                io::Error::new(io::ErrorKind::PermissionDenied, "medium is read-only"),
            ));
        }

        let bytes = codec::encode(collection).map_err(StorageError::Encode)?;
        let encoded = String::from_utf8(bytes)
            .map_err(|e| StorageError::write(LOCATION, io::Error::new(io::ErrorKind::InvalidData, e)))?;
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = encoded;
        Ok(())
    }

    fn describe(&self) -> String {
        LOCATION.to_string()
    }
}
