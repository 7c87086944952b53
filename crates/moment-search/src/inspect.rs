//! Read-only inspection of committed index contents.
//!
//! This is not a query service: it counts and lists what a run left
//! behind, for status reporting and verification.

use tantivy::collector::{Count, DocSetCollector};
use tantivy::query::{AllQuery, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::{IndexReader, TantivyDocument, Term};
use tracing::debug;

use moment_types::IndexableDocument;

use crate::document::from_tantivy_doc;
use crate::error::StoreError;
use crate::index::{MomentIndex, StoreConfig};
use crate::schema::MomentSchema;

/// Reader over the last committed state of an index.
pub struct IndexInspector {
    reader: IndexReader,
    schema: MomentSchema,
}

impl IndexInspector {
    /// Open an inspector on an existing index.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let index = MomentIndex::open_existing(config)?;
        Self::new(&index)
    }

    /// Create an inspector from an already opened index.
    pub fn new(index: &MomentIndex) -> Result<Self, StoreError> {
        Ok(Self {
            reader: index.reader()?,
            schema: index.schema().clone(),
        })
    }

    /// Pick up commits made after this inspector was created.
    pub fn reload(&self) -> Result<(), StoreError> {
        self.reader.reload()?;
        debug!("Reloaded index reader");
        Ok(())
    }

    /// Get the number of committed documents.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Count documents whose stored name matches exactly.
    pub fn count_by_name(&self, name: &str) -> Result<usize, StoreError> {
        let searcher = self.reader.searcher();
        let term = Term::from_field_text(self.schema.name, name);
        let query = TermQuery::new(term, IndexRecordOption::Basic);
        Ok(searcher.search(&query, &Count)?)
    }

    /// All committed documents, ordered by date then name.
    pub fn documents(&self) -> Result<Vec<IndexableDocument>, StoreError> {
        let searcher = self.reader.searcher();
        let addresses = searcher.search(&AllQuery, &DocSetCollector)?;

        let mut documents = Vec::with_capacity(addresses.len());
        for address in addresses {
            let doc: TantivyDocument = searcher.doc(address)?;
            documents.push(from_tantivy_doc(&self.schema, &doc));
        }
        documents.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        Ok(documents)
    }
}
