//! Mapping between IndexableDocument and Tantivy documents.

use tantivy::doc;
use tantivy::schema::{Field, Value};
use tantivy::TantivyDocument;

use moment_types::IndexableDocument;

use crate::schema::MomentSchema;

/// Convert an IndexableDocument to a Tantivy document.
pub fn to_tantivy_doc(schema: &MomentSchema, document: &IndexableDocument) -> TantivyDocument {
    doc!(
        schema.name => document.name.clone(),
        schema.date => document.date.clone(),
        schema.size => document.size.clone()
    )
}

/// Read a stored Tantivy document back. Missing fields come back empty.
pub fn from_tantivy_doc(schema: &MomentSchema, doc: &TantivyDocument) -> IndexableDocument {
    let text = |field: Field| {
        doc.get_first(field)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    };

    IndexableDocument::new(text(schema.name), text(schema.date), text(schema.size))
}
