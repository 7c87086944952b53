//! Store error types.

use tantivy::directory::error::LockError;
use tantivy::TantivyError;
use thiserror::Error;

/// Errors that can occur while opening, writing or reading the index.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Tantivy index error
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Index not found
    #[error("Index not found at path: {0}")]
    IndexNotFound(String),

    /// Schema mismatch
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Index is locked (another writer has it open)
    #[error("Index is locked: {0}")]
    IndexLocked(String),
}

impl StoreError {
    /// Map tantivy errors, splitting out writer lock contention.
    ///
    /// Only a busy lock means another writer holds the store. A lock file
    /// that cannot be created is an I/O failure.
    pub(crate) fn from_tantivy(err: TantivyError, path: &std::path::Path) -> Self {
        match err {
            TantivyError::LockFailure(LockError::LockBusy, _) => {
                StoreError::IndexLocked(path.display().to_string())
            }
            TantivyError::LockFailure(LockError::IoError(io_err), _) => {
                StoreError::Io(std::io::Error::new(io_err.kind(), io_err.to_string()))
            }
            other => StoreError::Tantivy(other),
        }
    }
}
