//! # moment-search
//!
//! Persistent image metadata index for Momentizer using Tantivy.
//!
//! ## Features
//! - Embedded Tantivy index with MmapDirectory for persistence
//! - Fixed three-field schema: name, date, size (all STRING | STORED)
//! - Create-or-append sessions with explicit commit and close
//! - Read-only inspection of committed documents
//!
//! One [`IndexSession`] holds the index writer lock for its whole
//! lifetime, so two sessions can never write the same store.

pub mod document;
pub mod error;
pub mod index;
pub mod inspect;
pub mod schema;
pub mod session;

pub use document::{from_tantivy_doc, to_tantivy_doc};
pub use error::StoreError;
pub use index::{MomentIndex, StoreConfig};
pub use inspect::IndexInspector;
pub use schema::{build_moment_schema, MomentSchema};
pub use session::{IndexSession, IndexStore};
