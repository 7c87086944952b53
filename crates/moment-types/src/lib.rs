//! # moment-types
//!
//! Shared domain types for the Momentizer image indexer.
//!
//! This crate defines the core data structures used throughout the system:
//! - FileEntry: Snapshot of a filesystem node visited during a scan
//! - IndexableDocument: The flat record stored in the index for one image
//! - Settings: Layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use moment_types::{EntryKind, FileEntry};
//!
//! let entry = FileEntry::file("/photos/beach.jpg");
//! assert_eq!(entry.kind(), EntryKind::File);
//! assert_eq!(entry.file_name(), "beach.jpg");
//! ```

pub mod config;
pub mod document;
pub mod entry;
pub mod error;

pub use config::{Settings, MIN_WRITER_MEMORY_MB};
pub use document::IndexableDocument;
pub use entry::{EntryKind, FileEntry, FileStat};
pub use error::MomentError;
