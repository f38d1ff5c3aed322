//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing the repository.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key not found.
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key is empty or contains characters the backend cannot store.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// The record changed between read and write.
    #[error("Concurrent modification of {key}: expected version {expected}, found {found}")]
    VersionConflict {
        key: String,
        expected: u64,
        found: u64,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
