//! Filesystem entry snapshots.
//!
//! A FileEntry is handed to scan visitors for exactly one callback and is
//! not retained afterwards. Size and modification time are read lazily
//! through [`FileEntry::stat`] so that a file removed mid-scan surfaces as
//! an error for that entry only.

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a visited filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
        }
    }
}

/// A filesystem node visited during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    kind: EntryKind,
}

impl FileEntry {
    /// Create an entry for a regular file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    /// Create an entry for a directory.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Base name of the entry. Non UTF-8 names are converted lossily.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Read size and modification time from the filesystem.
    ///
    /// Symlinks are resolved, so a link to a regular file reports the
    /// target's metadata.
    pub fn stat(&self) -> io::Result<FileStat> {
        let metadata = std::fs::metadata(&self.path)?;
        FileStat::from_metadata(&metadata)
    }
}

/// Size and modification time of a file at the moment it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Length in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

impl FileStat {
    pub fn new(size: u64, modified: DateTime<Utc>) -> Self {
        Self { size, modified }
    }

    /// Build from std metadata. Fails on platforms without mtime support.
    pub fn from_metadata(metadata: &Metadata) -> io::Result<Self> {
        let modified = metadata.modified()?;
        Ok(Self {
            size: metadata.len(),
            modified: DateTime::<Utc>::from(modified),
        })
    }
}
