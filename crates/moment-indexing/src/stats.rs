//! Run statistics.
//!
//! Counters are independent atomics. They are not updated together, so
//! the relation between them holds only because the indexer increments
//! them in a fixed order for each entry.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::info;

/// Column width of the statistics table.
const COLUMN_WIDTH: usize = 10;

/// Counters for one indexing run.
#[derive(Debug, Default)]
pub struct StatsCollector {
    total: AtomicU64,
    folders: AtomicU64,
    skipped: AtomicU64,
    indexed: AtomicU64,
    failed: AtomicU64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a visited file or folder.
    pub fn record_entry(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_folder(&self) {
        self.folders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_indexed(&self) {
        self.indexed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all counts as a snapshot.
    pub fn snapshot(&self) -> RunStatistics {
        RunStatistics {
            total: self.total.load(Ordering::Relaxed),
            folders: self.folders.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            indexed: self.indexed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of the counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Files and folders visited
    pub total: u64,
    /// Folders visited
    pub folders: u64,
    /// Files that are not images
    pub skipped: u64,
    /// Images added to the index
    pub indexed: u64,
    /// Entries whose visit failed
    pub failed: u64,
}

impl RunStatistics {
    /// Entries that reached a counted branch (folder, skipped or indexed).
    pub fn accounted(&self) -> u64 {
        self.folders + self.skipped + self.indexed
    }

    /// Entries counted in `total` whose visit failed before reaching a
    /// counted branch.
    pub fn unaccounted(&self) -> u64 {
        self.total.saturating_sub(self.accounted())
    }

    /// Header row of the summary table.
    pub fn header_row() -> String {
        format_row(["Total", "Indexed", "Folder", "Skipped", "Failed"])
    }

    /// Data row of the summary table, in header order.
    pub fn data_row(&self) -> String {
        format_row([
            self.total.to_string(),
            self.indexed.to_string(),
            self.folders.to_string(),
            self.skipped.to_string(),
            self.failed.to_string(),
        ])
    }

    /// Log the summary table.
    pub fn report(&self) {
        info!("Index Stats are as below:");
        info!("{}", Self::header_row());
        info!("{}", self.data_row());
    }
}

fn format_row<S: AsRef<str>>(cells: [S; 5]) -> String {
    cells
        .iter()
        .map(|c| format!("{:>width$}", c.as_ref(), width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" | ")
}
