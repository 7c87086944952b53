//! Index sessions: the write side of the store for one indexing run.
//!
//! A session owns the index writer, and with it the writer lock, from
//! `open` to `close`. Documents added to a session are not visible to
//! readers until `commit()` is called. `close` consumes the session, so it
//! runs at most once.

use tantivy::IndexWriter;
use tracing::{debug, info, warn};

use moment_types::IndexableDocument;

use crate::document::to_tantivy_doc;
use crate::error::StoreError;
use crate::index::{MomentIndex, StoreConfig};
use crate::schema::MomentSchema;

/// Write-side contract of a persistent document store.
///
/// Implemented by [`IndexSession`] and by test doubles that track how
/// the store is driven.
pub trait IndexStore {
    /// Append one document. No deduplication takes place.
    fn add(&mut self, document: &IndexableDocument) -> Result<(), StoreError>;

    /// Make all documents added since open durable and queryable.
    fn commit(&mut self) -> Result<u64, StoreError>;

    /// Release the store. Uncommitted documents are discarded.
    fn close(self) -> Result<(), StoreError>
    where
        Self: Sized;
}

/// An open, exclusive write session on a Tantivy index.
pub struct IndexSession {
    index: MomentIndex,
    writer: IndexWriter,
    schema: MomentSchema,
    uncommitted: u64,
}

impl IndexSession {
    /// Open the store in create-or-append mode.
    ///
    /// Creates the directory if needed. Fails with
    /// [`StoreError::IndexLocked`] if another session holds the store.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let index = MomentIndex::open_or_create(config)?;
        let writer = index.writer()?;
        let schema = index.schema().clone();

        info!(path = ?index.path(), "Opened index session");

        Ok(Self {
            index,
            writer,
            schema,
            uncommitted: 0,
        })
    }

    /// Get the underlying index
    pub fn index(&self) -> &MomentIndex {
        &self.index
    }

    /// Number of documents added since the last commit.
    pub fn uncommitted(&self) -> u64 {
        self.uncommitted
    }
}

impl IndexStore for IndexSession {
    fn add(&mut self, document: &IndexableDocument) -> Result<(), StoreError> {
        let doc = to_tantivy_doc(&self.schema, document);
        self.writer.add_document(doc)?;
        self.uncommitted += 1;

        debug!(name = %document.name, "Added document");
        Ok(())
    }

    fn commit(&mut self) -> Result<u64, StoreError> {
        let opstamp = self.writer.commit()?;
        info!(opstamp, documents = self.uncommitted, "Committed index changes");
        self.uncommitted = 0;
        Ok(opstamp)
    }

    fn close(mut self) -> Result<(), StoreError> {
        if self.uncommitted > 0 {
            warn!(
                documents = self.uncommitted,
                "Closing index session with uncommitted documents, discarding them"
            );
            self.writer.rollback()?;
        }
        self.writer.wait_merging_threads()?;
        info!(path = ?self.index.path(), "Closed index session");
        Ok(())
    }
}
