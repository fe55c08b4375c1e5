//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - namespaces(id, name, createdAt, isDefault)
//! - snippets(id, title, description, code, language, category, namespaceId,
//!   hasPreview, functionName, inputParameters, createdAt, updatedAt)

pub mod schema;
pub mod sqlite;

pub use sqlite::{SnippetStore, DbStats};
