//! End-to-end test infrastructure for Momentizer.
//!
//! Provides a shared TestHarness that lays out a photo tree in a temp
//! directory and opens indexers and inspectors on it.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use moment_indexing::Indexer;
use moment_search::{IndexInspector, StoreConfig};

/// Shared test harness for E2E tests.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Root of the scanned tree
    pub root: PathBuf,
    /// Where the indexer keeps its store
    pub index_path: PathBuf,
}

impl TestHarness {
    /// Create a harness with an empty root directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("photos");
        std::fs::create_dir_all(&root).expect("Failed to create root dir");
        let index_path = root.join("index");

        Self {
            _temp_dir: temp_dir,
            root,
            index_path,
        }
    }

    /// Write a file below the root, creating parent folders.
    pub fn write_file(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Write a file and pin its modification time.
    pub fn write_file_modified(&self, rel: &str, contents: &[u8], modified: SystemTime) -> PathBuf {
        let path = self.write_file(rel, contents);
        let file = std::fs::File::options()
            .write(true)
            .open(&path)
            .expect("Failed to open file");
        file.set_modified(modified).expect("Failed to set mtime");
        path
    }

    /// Create a folder below the root.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.root.join(rel);
        std::fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    /// Indexer over the root with the default store location.
    pub fn indexer(&self) -> Indexer {
        Indexer::new(&self.root).expect("Failed to create indexer")
    }

    /// Store configuration matching [`TestHarness::indexer`].
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.index_path)
    }

    /// Inspector over the committed index.
    pub fn inspector(&self) -> IndexInspector {
        IndexInspector::open(self.store_config()).expect("Failed to open index")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Lay out a small photo library:
///
/// ```text
/// beach.jpg, README
/// 2023/summer/sea.JPEG, 2023/summer/notes.md
/// 2023/winter/snow.gif, 2023/winter/IMG_0042.Jpg
/// misc/scan.PNG, misc/archive.zip
/// ```
///
/// 5 images, 3 other files, 4 folders.
pub fn build_photo_library(harness: &TestHarness) {
    harness.write_file("beach.jpg", b"jpeg-bytes");
    harness.write_file("README", b"no extension");
    harness.write_file("2023/summer/sea.JPEG", b"sea");
    harness.write_file("2023/summer/notes.md", b"# notes");
    harness.write_file("2023/winter/snow.gif", b"gif");
    harness.write_file("misc/scan.PNG", b"png");
    harness.write_file("misc/archive.zip", b"zip");
    harness.write_file("2023/winter/IMG_0042.Jpg", b"jpg");
}
