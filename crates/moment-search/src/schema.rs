//! Tantivy schema definition for image metadata.
//!
//! Every field is an untokenized STRING so that exact names and
//! timestamp strings can be matched and sorted as written.

use tantivy::schema::{Field, Schema, STORED, STRING};

use moment_types::document::{FIELD_DATE, FIELD_NAME, FIELD_SIZE};

use crate::StoreError;

/// Schema field handles for efficient access
#[derive(Debug, Clone)]
pub struct MomentSchema {
    schema: Schema,
    /// File base name (STRING | STORED)
    pub name: Field,
    /// Modification time, yyyyMMddHHmmssSSS UTC (STRING | STORED)
    pub date: Field,
    /// Byte length as decimal text (STRING | STORED)
    pub size: Field,
}

impl MomentSchema {
    /// Get the underlying Tantivy schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create a MomentSchema from an existing Tantivy Schema
    pub fn from_schema(schema: Schema) -> Result<Self, StoreError> {
        let name = lookup(&schema, FIELD_NAME)?;
        let date = lookup(&schema, FIELD_DATE)?;
        let size = lookup(&schema, FIELD_SIZE)?;

        Ok(Self {
            schema,
            name,
            date,
            size,
        })
    }
}

fn lookup(schema: &Schema, field: &str) -> Result<Field, StoreError> {
    schema
        .get_field(field)
        .map_err(|_| StoreError::SchemaMismatch(format!("missing {} field", field)))
}

/// Build the image metadata schema.
///
/// Schema fields:
/// - name: STRING | STORED
/// - date: STRING | STORED
/// - size: STRING | STORED
pub fn build_moment_schema() -> MomentSchema {
    let mut schema_builder = Schema::builder();

    let name = schema_builder.add_text_field(FIELD_NAME, STRING | STORED);
    let date = schema_builder.add_text_field(FIELD_DATE, STRING | STORED);
    let size = schema_builder.add_text_field(FIELD_SIZE, STRING | STORED);

    let schema = schema_builder.build();

    MomentSchema {
        schema,
        name,
        date,
        size,
    }
}
