//! Error types for the indexing pipeline.

use moment_search::StoreError;
use moment_types::MomentError;
use thiserror::Error;

/// A failure confined to a single scanned entry.
///
/// Never ends a run: the scanner hands it to the visitor's error callback.
#[derive(Error, Debug)]
pub enum EntryError {
    /// File metadata could not be read (e.g. removed mid-scan)
    #[error("Metadata error: {0}")]
    Metadata(#[from] std::io::Error),

    /// A directory could not be listed
    #[error("Listing error: {0}")]
    Listing(#[from] walkdir::Error),

    /// The store rejected a document
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Failure raised by a custom visitor
    #[error("Visitor error: {0}")]
    Visitor(String),
}

/// A failure that ends an indexing run.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Invalid root directory or settings, detected before any traversal
    #[error("Configuration error: {0}")]
    Config(String),

    /// The index store could not be opened
    #[error("Failed to open index store: {0}")]
    StoreOpen(#[source] StoreError),

    /// The index store could not be committed
    #[error("Failed to commit index store: {0}")]
    StoreCommit(#[source] StoreError),
}

impl From<MomentError> for IndexerError {
    fn from(err: MomentError) -> Self {
        IndexerError::Config(err.to_string())
    }
}
