//! Storage error types
//!
//! Error codes:
//! - CRUD_STORAGE_READ_FAILED: medium could not be read
//! - CRUD_STORAGE_MALFORMED: medium holds something that is not a collection
//! - CRUD_STORAGE_ENCODE_FAILED: collection could not be serialized
//! - CRUD_STORAGE_WRITE_FAILED: medium could not be replaced

use std::fmt;
use std::io;

use thiserror::Error;

/// Which side of the medium failed.
///
/// Read failures are not retryable until the medium is fixed externally.
/// Write failures leave the previous document in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    Read,
    Write,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageErrorKind::Read => write!(f, "READ"),
            StorageErrorKind::Write => write!(f, "WRITE"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed collection in {location}: {source}")]
    Malformed {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode collection: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write {location}: {source}")]
    Write {
        location: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub fn read(location: impl Into<String>, source: io::Error) -> Self {
        Self::Read {
            location: location.into(),
            source,
        }
    }

    pub fn malformed(location: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Malformed {
            location: location.into(),
            source,
        }
    }

    pub fn write(location: impl Into<String>, source: io::Error) -> Self {
        Self::Write {
            location: location.into(),
            source,
        }
    }

    pub fn kind(&self) -> StorageErrorKind {
        match self {
            StorageError::Read { .. } | StorageError::Malformed { .. } => StorageErrorKind::Read,
            StorageError::Encode(_) | StorageError::Write { .. } => StorageErrorKind::Write,
        }
    }

    /// Stable string code for logs and API bodies
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::Read { .. } => "CRUD_STORAGE_READ_FAILED",
            StorageError::Malformed { .. } => "CRUD_STORAGE_MALFORMED",
            StorageError::Encode(_) => "CRUD_STORAGE_ENCODE_FAILED",
            StorageError::Write { .. } => "CRUD_STORAGE_WRITE_FAILED",
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
