//! Indexing run orchestration.
//!
//! One run moves through `Idle -> Opening -> Scanning -> Committing ->
//! Closed`. A store that cannot be opened or committed moves the run to
//! `Failed`; errors on single entries never do.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use moment_search::{IndexSession, IndexStore, StoreConfig, StoreError};
use moment_types::{FileEntry, Settings};

use crate::classifier::is_indexable;
use crate::document::build_document;
use crate::error::{EntryError, IndexerError};
use crate::scanner::{ScanVisitor, Scanner};
use crate::stats::{RunStatistics, StatsCollector};

/// Lifecycle state of the indexer's current or last run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexerState {
    Idle,
    Opening,
    Scanning,
    Committing,
    Closed,
    Failed,
}

impl std::fmt::Display for IndexerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IndexerState::Idle => "idle",
            IndexerState::Opening => "opening",
            IndexerState::Scanning => "scanning",
            IndexerState::Committing => "committing",
            IndexerState::Closed => "closed",
            IndexerState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Indexes the image files below a working directory.
///
/// The store lives inside the working directory and is excluded from the
/// scan. An indexer can run any number of times; every run appends.
pub struct Indexer {
    scanner: Scanner,
    store_config: StoreConfig,
    state: IndexerState,
    last_run: RunStatistics,
}

impl Indexer {
    /// Create an indexer with the store at `<root>/index`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, IndexerError> {
        let root = root.into();
        let store_config = StoreConfig::new(root.join("index"));
        Self::with_store(root, store_config)
    }

    /// Create an indexer from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, IndexerError> {
        settings.validate()?;
        let store_config = StoreConfig::new(settings.index_path())
            .with_memory_mb(settings.writer_memory_mb);
        Self::with_store(settings.expanded_root_dir(), store_config)
    }

    /// Create an indexer with an explicit store configuration.
    ///
    /// Validates the root before anything else happens.
    pub fn with_store(
        root: impl Into<PathBuf>,
        store_config: StoreConfig,
    ) -> Result<Self, IndexerError> {
        let scanner = Scanner::new(root)?.exclude(store_config.index_path.clone());
        info!(
            root = ?scanner.root(),
            "Moment Indexer initialized with working directory"
        );
        Ok(Self {
            scanner,
            store_config,
            state: IndexerState::Idle,
            last_run: RunStatistics::default(),
        })
    }

    /// Directory being indexed.
    pub fn working_directory(&self) -> &Path {
        self.scanner.root()
    }

    /// Location of the index store.
    pub fn store_path(&self) -> &Path {
        &self.store_config.index_path
    }

    pub fn state(&self) -> IndexerState {
        self.state
    }

    /// Counters of the most recent run, including one that failed.
    pub fn last_run(&self) -> RunStatistics {
        self.last_run
    }

    /// Run once against the Tantivy store.
    pub fn run(&mut self) -> Result<RunStatistics, IndexerError> {
        let config = self.store_config.clone();
        self.run_with(move || IndexSession::open(config))
    }

    /// Run once against the store produced by `open_store`.
    ///
    /// The store is closed exactly once after it was opened, whether or
    /// not the commit succeeded.
    pub fn run_with<S, F>(&mut self, open_store: F) -> Result<RunStatistics, IndexerError>
    where
        S: IndexStore,
        F: FnOnce() -> Result<S, StoreError>,
    {
        info!(root = ?self.working_directory(), "Indexing started...");
        let stats = StatsCollector::new();
        self.last_run = stats.snapshot();

        self.transition(IndexerState::Opening);
        let mut store = match open_store() {
            Ok(store) => store,
            Err(e) => {
                error!(
                    root = ?self.working_directory(),
                    error = %e,
                    "I/O error occurred while opening index"
                );
                self.transition(IndexerState::Failed);
                info!("Indexing failed!");
                return Err(IndexerError::StoreOpen(e));
            }
        };

        self.transition(IndexerState::Scanning);
        {
            let mut visitor = IndexingVisitor {
                store: &mut store,
                stats: &stats,
            };
            self.scanner.scan(&mut visitor);
        }
        self.last_run = stats.snapshot();

        self.transition(IndexerState::Committing);
        let committed = store.commit();
        if let Err(e) = store.close() {
            warn!(error = %e, "Failed to close index store");
        }

        match committed {
            Ok(opstamp) => {
                self.transition(IndexerState::Closed);
                debug!(opstamp, "Index committed");
                self.last_run.report();
                info!("Indexing completed.");
                Ok(self.last_run)
            }
            Err(e) => {
                error!(
                    root = ?self.working_directory(),
                    error = %e,
                    "I/O error occurred while committing index"
                );
                self.transition(IndexerState::Failed);
                info!("Indexing failed!");
                Err(IndexerError::StoreCommit(e))
            }
        }
    }

    fn transition(&mut self, next: IndexerState) {
        debug!(from = %self.state, to = %next, "Indexer state change");
        self.state = next;
    }
}

/// Visitor wiring classification, document building and the store.
struct IndexingVisitor<'a, S: IndexStore> {
    store: &'a mut S,
    stats: &'a StatsCollector,
}

impl<S: IndexStore> ScanVisitor for IndexingVisitor<'_, S> {
    fn on_file(&mut self, entry: &FileEntry) -> Result<(), EntryError> {
        self.stats.record_entry();
        if !is_indexable(&entry.file_name()) {
            self.stats.record_skipped();
            return Ok(());
        }
        let document = build_document(entry)?;
        self.store.add(&document)?;
        self.stats.record_indexed();
        Ok(())
    }

    fn on_folder(&mut self, _entry: &FileEntry) -> Result<(), EntryError> {
        self.stats.record_entry();
        self.stats.record_folder();
        Ok(())
    }

    fn on_error(&mut self, entry: &FileEntry, cause: &EntryError) {
        self.stats.record_failed();
        error!(
            path = %entry.path().display(),
            kind = %entry.kind(),
            error = %cause,
            "Exception occurred while scanning file/folder"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moment_search::IndexInspector;
    use moment_types::IndexableDocument;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Shared record of how a fake store was driven.
    #[derive(Debug, Default)]
    struct StoreLog {
        added: Vec<IndexableDocument>,
        commits: usize,
        closes: usize,
    }

    /// In-memory store that records every call and can be told to fail.
    struct TrackingStore {
        log: Rc<RefCell<StoreLog>>,
        fail_commit: bool,
        reject: Option<String>,
    }

    impl TrackingStore {
        fn new(log: &Rc<RefCell<StoreLog>>) -> Self {
            Self {
                log: Rc::clone(log),
                fail_commit: false,
                reject: None,
            }
        }
    }

    impl IndexStore for TrackingStore {
        fn add(&mut self, document: &IndexableDocument) -> Result<(), StoreError> {
            if self.reject.as_deref() == Some(document.name.as_str()) {
                return Err(StoreError::SchemaMismatch("rejected".to_string()));
            }
            self.log.borrow_mut().added.push(document.clone());
            Ok(())
        }

        fn commit(&mut self) -> Result<u64, StoreError> {
            self.log.borrow_mut().commits += 1;
            if self.fail_commit {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            Ok(1)
        }

        fn close(self) -> Result<(), StoreError> {
            self.log.borrow_mut().closes += 1;
            Ok(())
        }
    }

    fn photo_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("photo.JPG"), b"12345").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"memo").unwrap();
        temp_dir
    }

    #[test]
    fn test_single_photo_run() {
        let temp_dir = photo_tree();
        let mut indexer = Indexer::new(temp_dir.path()).unwrap();

        let stats = indexer.run().unwrap();

        assert_eq!(
            stats,
            RunStatistics {
                total: 2,
                folders: 0,
                skipped: 1,
                indexed: 1,
                failed: 0,
            }
        );
        assert_eq!(indexer.state(), IndexerState::Closed);

        let inspector = IndexInspector::open(StoreConfig::new(indexer.store_path())).unwrap();
        let docs = inspector.documents().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "photo.JPG");
        assert_eq!(docs[0].size, "5");
    }

    #[test]
    fn test_store_directory_is_not_scanned() {
        let temp_dir = photo_tree();
        let mut indexer = Indexer::new(temp_dir.path()).unwrap();

        indexer.run().unwrap();
        let second = indexer.run().unwrap();

        // The index directory exists now but is never counted
        assert_eq!(second.folders, 0);
        assert_eq!(second.total, 2);
    }

    #[test]
    fn test_close_once_after_commit() {
        let temp_dir = photo_tree();
        let mut indexer = Indexer::new(temp_dir.path()).unwrap();
        let log = Rc::new(RefCell::new(StoreLog::default()));

        indexer
            .run_with(|| Ok(TrackingStore::new(&log)))
            .unwrap();

        let log = log.borrow();
        assert_eq!(log.added.len(), 1);
        assert_eq!(log.commits, 1);
        assert_eq!(log.closes, 1);
    }

    #[test]
    fn test_close_once_when_commit_fails() {
        let temp_dir = photo_tree();
        let mut indexer = Indexer::new(temp_dir.path()).unwrap();
        let log = Rc::new(RefCell::new(StoreLog::default()));

        let result = indexer.run_with(|| {
            let mut store = TrackingStore::new(&log);
            store.fail_commit = true;
            Ok(store)
        });

        assert!(matches!(result, Err(IndexerError::StoreCommit(_))));
        assert_eq!(indexer.state(), IndexerState::Failed);
        let log = log.borrow();
        assert_eq!(log.commits, 1);
        assert_eq!(log.closes, 1);
    }

    #[test]
    fn test_open_failure_visits_nothing() {
        let temp_dir = photo_tree();
        std::fs::create_dir(temp_dir.path().join("album")).unwrap();
        let mut indexer = Indexer::new(temp_dir.path()).unwrap();

        let result = indexer.run_with(|| -> Result<TrackingStore, StoreError> {
            Err(StoreError::IndexLocked("held elsewhere".to_string()))
        });

        assert!(matches!(result, Err(IndexerError::StoreOpen(_))));
        assert_eq!(indexer.state(), IndexerState::Failed);
        assert_eq!(indexer.last_run(), RunStatistics::default());
    }

    #[test]
    fn test_open_failure_resets_previous_counts() {
        let temp_dir = photo_tree();
        let mut indexer = Indexer::new(temp_dir.path()).unwrap();
        let log = Rc::new(RefCell::new(StoreLog::default()));

        indexer.run_with(|| Ok(TrackingStore::new(&log))).unwrap();
        assert_eq!(indexer.last_run().total, 2);

        let result = indexer.run_with(|| -> Result<TrackingStore, StoreError> {
            Err(StoreError::IndexLocked("held elsewhere".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(indexer.last_run().total, 0);
        assert_eq!(log.borrow().added.len(), 1);
    }

    #[test]
    fn test_commit_failure_keeps_visit_counts() {
        let temp_dir = photo_tree();
        let mut indexer = Indexer::new(temp_dir.path()).unwrap();
        let log = Rc::new(RefCell::new(StoreLog::default()));

        let result = indexer.run_with(|| {
            let mut store = TrackingStore::new(&log);
            store.fail_commit = true;
            Ok(store)
        });

        assert!(result.is_err());
        assert_eq!(indexer.last_run().total, 2);
        assert_eq!(indexer.last_run().indexed, 1);
    }

    #[test]
    fn test_rejected_document_is_isolated() {
        let temp_dir = photo_tree();
        std::fs::write(temp_dir.path().join("other.png"), b"png").unwrap();
        let mut indexer = Indexer::new(temp_dir.path()).unwrap();
        let log = Rc::new(RefCell::new(StoreLog::default()));

        let stats = indexer
            .run_with(|| {
                let mut store = TrackingStore::new(&log);
                store.reject = Some("photo.JPG".to_string());
                Ok(store)
            })
            .unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.indexed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 1);
        // The failed entry was counted in total but in no branch
        assert_eq!(stats.unaccounted(), 1);
        assert_eq!(log.borrow().added[0].name, "other.png");
    }

    #[test]
    fn test_folders_count_toward_total() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("2023/summer")).unwrap();
        std::fs::write(root.join("2023/summer/sea.jpeg"), b"x").unwrap();
        std::fs::write(root.join("2023/list.csv"), b"x").unwrap();
        let mut indexer = Indexer::new(root).unwrap();
        let log = Rc::new(RefCell::new(StoreLog::default()));

        let stats = indexer.run_with(|| Ok(TrackingStore::new(&log))).unwrap();

        assert_eq!(stats.folders, 2);
        assert_eq!(stats.indexed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.total, stats.accounted());
    }

    #[test]
    fn test_invalid_root_fails_at_construction() {
        let temp_dir = TempDir::new().unwrap();
        let result = Indexer::new(temp_dir.path().join("missing"));
        assert!(matches!(result, Err(IndexerError::Config(_))));
    }

    #[test]
    fn test_from_settings_uses_index_dir_name() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings {
            root_dir: temp_dir.path().to_string_lossy().to_string(),
            index_dir_name: "moments".to_string(),
            ..Default::default()
        };

        let indexer = Indexer::from_settings(&settings).unwrap();
        assert_eq!(indexer.store_path(), temp_dir.path().join("moments"));
        assert_eq!(indexer.state(), IndexerState::Idle);
    }

    #[test]
    fn test_from_settings_rejects_small_writer_budget() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings {
            root_dir: temp_dir.path().to_string_lossy().to_string(),
            writer_memory_mb: 10,
            ..Default::default()
        };

        let result = Indexer::from_settings(&settings);
        assert!(matches!(result, Err(IndexerError::Config(_))));
        assert!(!temp_dir.path().join("index").exists());
    }
}
