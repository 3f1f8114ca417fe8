//! Record store error types
//!
//! Error codes:
//! - CRUD_RECORD_NOT_FOUND: no record carries the requested id (client-visible)
//! - CRUD_STORE_UNAVAILABLE: the persistence layer failed (server-side fault)

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(u64),

    #[error("store unavailable: {0}")]
    Unavailable(#[from] StorageError),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "CRUD_RECORD_NOT_FOUND",
            StoreError::Unavailable(_) => "CRUD_STORE_UNAVAILABLE",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_storage_errors_become_unavailable() {
        let storage_err = StorageError::write("data.json", io::Error::new(io::ErrorKind::Other, "disk full"));
        let err: StoreError = storage_err.into();
        assert!(!err.is_not_found());
        assert_eq!(err.code(), "CRUD_STORE_UNAVAILABLE");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_not_found_display() {
        let err = StoreError::NotFound(42);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "record 42 not found");
    }
}
