//! Building index documents from scanned files.

use chrono::{DateTime, Utc};

use moment_types::{FileEntry, FileStat, IndexableDocument};

use crate::error::EntryError;

/// Millisecond-resolution timestamp layout, e.g. `20240115093000123`.
///
/// Fixed width and most significant unit first, so string order is time
/// order.
pub const DATE_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Format a timestamp in UTC with [`DATE_FORMAT`].
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(DATE_FORMAT).to_string()
}

/// Build the document for a file entry.
///
/// Metadata is read here, so a file that disappeared since it was listed
/// yields an [`EntryError`] for this entry only.
pub fn build_document(entry: &FileEntry) -> Result<IndexableDocument, EntryError> {
    let stat = entry.stat()?;
    Ok(document_from_stat(entry.file_name(), &stat))
}

/// Build a document from a name and an already read metadata snapshot.
pub fn document_from_stat(name: impl Into<String>, stat: &FileStat) -> IndexableDocument {
    IndexableDocument::new(name, format_date(&stat.modified), stat.size.to_string())
}
