//! Image indexing pipeline for Momentizer.
//!
//! This crate walks a directory tree, picks out image files and records
//! their metadata in the persistent index provided by `moment-search`.
//!
//! ## Key Components
//!
//! - [`Scanner`]: Depth-first walker driving a [`ScanVisitor`]
//! - [`is_indexable`]: Extension allow-list for image files
//! - [`build_document`]: FileEntry to IndexableDocument conversion
//! - [`StatsCollector`]: Atomic run counters and the summary table
//! - [`Indexer`]: Orchestrates one run from store open to close
//!
//! ## Error containment
//!
//! Failures on a single entry ([`EntryError`]) are routed to the
//! visitor's error callback, counted and logged; the walk goes on.
//! Failures of the store itself ([`IndexerError`]) end the run.
//!
//! ## Example
//!
//! ```ignore
//! use moment_indexing::Indexer;
//!
//! let mut indexer = Indexer::new("/srv/photos")?;
//! let stats = indexer.run()?;
//! println!("indexed {} images", stats.indexed);
//! ```

pub mod classifier;
pub mod document;
pub mod error;
pub mod indexer;
pub mod scanner;
pub mod stats;

pub use classifier::{classify, is_indexable, Classification, IMAGE_EXTENSIONS};
pub use document::{build_document, document_from_stat, format_date, DATE_FORMAT};
pub use error::{EntryError, IndexerError};
pub use indexer::{Indexer, IndexerState};
pub use scanner::{ScanVisitor, Scanner};
pub use stats::{RunStatistics, StatsCollector};
