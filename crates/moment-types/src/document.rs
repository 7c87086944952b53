//! The record stored in the index for one image file.

use serde::{Deserialize, Serialize};

/// Field holding the file's base name.
pub const FIELD_NAME: &str = "name";
/// Field holding the sortable modification timestamp.
pub const FIELD_DATE: &str = "date";
/// Field holding the byte length as a decimal string.
pub const FIELD_SIZE: &str = "size";

/// One indexed image.
///
/// All values are strings. The field set is closed: the index schema is
/// built from [`IndexableDocument::FIELDS`] and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexableDocument {
    /// Base name of the file, stored verbatim when it is valid UTF-8.
    ///
    /// Other names are stored with each invalid byte sequence replaced by
    /// U+FFFD, so two such files can share a stored name.
    pub name: String,

    /// Modification time as `yyyyMMddHHmmssSSS` in UTC
    pub date: String,

    /// File length in bytes, decimal
    pub size: String,
}

impl IndexableDocument {
    /// Names of all fields, in schema order.
    pub const FIELDS: [&'static str; 3] = [FIELD_NAME, FIELD_DATE, FIELD_SIZE];

    pub fn new(name: impl Into<String>, date: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            size: size.into(),
        }
    }

    /// Field name and value pairs, in schema order.
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            (FIELD_NAME, self.name.as_str()),
            (FIELD_DATE, self.date.as_str()),
            (FIELD_SIZE, self.size.as_str()),
        ]
    }
}
