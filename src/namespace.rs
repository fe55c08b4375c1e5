//! Namespace types
//!
//! A namespace is a named grouping bucket that snippets optionally belong
//! to. Exactly one namespace is seeded as the default at initialization;
//! the default can never be deleted and adopts the snippets of any
//! namespace that is.

use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored namespace as returned by read endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub is_default: bool,
}

/// Fields accepted when creating a namespace. An omitted `createdAt`
/// falls back to the server clock.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNamespace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub is_default: bool,
}
