//! # Snipstore - Snippet Persistence Service
//!
//! Namespace-aware CRUD API for code snippets over SQLite.
//!
//! Snipstore provides:
//! - SQLite-backed storage with per-request connections
//! - Startup schema migration away from the legacy flat-table shape
//! - Namespace grouping with a protected default namespace
//! - JSON HTTP API (axum) with configurable CORS
//! - Administrative wipe for a full reset to the seeded state

pub mod config;
pub mod namespace;
pub mod server;
pub mod snippet;
pub mod storage;
pub mod timestamp;

// Re-exports for convenient access
pub use namespace::Namespace;
pub use snippet::Snippet;
pub use storage::SnippetStore;

/// Result type alias for Snipstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Snipstore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),

    #[error("Namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("Cannot delete default namespace")]
    DefaultNamespaceProtected,
}
