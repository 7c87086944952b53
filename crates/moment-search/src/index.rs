//! On-disk index handle.
//!
//! An index directory is recognised by its `meta.json`. Opening for a run
//! creates the directory on first use and appends to it afterwards.

use std::path::{Path, PathBuf};

use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::schema::{build_moment_schema, MomentSchema};

const DEFAULT_WRITER_MEMORY_MB: usize = 50;

const BYTES_PER_MB: usize = 1024 * 1024;

/// Where the store lives and how much memory its writer may buffer.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub index_path: PathBuf,
    /// Writer budget in MB, split across tantivy's indexing threads
    pub writer_memory_mb: usize,
}

impl StoreConfig {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }

    pub fn with_memory_mb(mut self, mb: usize) -> Self {
        self.writer_memory_mb = mb;
        self
    }
}

/// True when `path` holds a committed index.
fn has_index(path: &Path) -> bool {
    path.join("meta.json").is_file()
}

/// An opened index together with its resolved schema fields.
pub struct MomentIndex {
    index: Index,
    schema: MomentSchema,
    config: StoreConfig,
}

impl MomentIndex {
    /// Open the index at the configured path, creating it when absent.
    pub fn open_or_create(config: StoreConfig) -> Result<Self, StoreError> {
        let index = if has_index(&config.index_path) {
            debug!(path = ?config.index_path, "Appending to existing index");
            Index::open_in_dir(&config.index_path)?
        } else {
            info!(path = ?config.index_path, "Creating new index");
            std::fs::create_dir_all(&config.index_path)?;
            Index::create_in_dir(&config.index_path, build_moment_schema().schema().clone())?
        };
        Self::from_index(index, config)
    }

    /// Open an index that a previous run already committed.
    pub fn open_existing(config: StoreConfig) -> Result<Self, StoreError> {
        if !has_index(&config.index_path) {
            return Err(StoreError::IndexNotFound(
                config.index_path.display().to_string(),
            ));
        }
        let index = Index::open_in_dir(&config.index_path)?;
        Self::from_index(index, config)
    }

    fn from_index(index: Index, config: StoreConfig) -> Result<Self, StoreError> {
        let schema = MomentSchema::from_schema(index.schema())?;
        Ok(Self {
            index,
            schema,
            config,
        })
    }

    pub fn schema(&self) -> &MomentSchema {
        &self.schema
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn path(&self) -> &Path {
        &self.config.index_path
    }

    /// Take the writer lock for this index.
    ///
    /// Fails with [`StoreError::IndexLocked`] while another writer is alive.
    pub fn writer(&self) -> Result<IndexWriter, StoreError> {
        let writer = self
            .index
            .writer(self.config.writer_memory_mb * BYTES_PER_MB)
            .map_err(|e| StoreError::from_tantivy(e, self.path()))?;
        debug!(memory_mb = self.config.writer_memory_mb, "Acquired index writer");
        Ok(writer)
    }

    /// A reader that sees new commits only after an explicit reload.
    pub fn reader(&self) -> Result<IndexReader, StoreError> {
        Ok(self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?)
    }
}
