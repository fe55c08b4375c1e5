//! Snippet types
//!
//! A snippet is a unit of reusable code with metadata: language, category,
//! optional namespace membership, and optional live-preview metadata
//! (`functionName` + `inputParameters`). `inputParameters` is an arbitrary
//! JSON value persisted as encoded text and decoded back on read.

use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

fn default_category() -> String {
    "general".to_string()
}

/// A stored snippet as returned by read endpoints.
///
/// Timestamps are epoch milliseconds; `hasPreview` is coerced from the
/// 0/1 integer column; `inputParameters` is decoded from its stored text
/// form (decode failure yields `null`, not an error).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub language: String,
    pub category: String,
    pub namespace_id: Option<String>,
    pub has_preview: bool,
    pub function_name: Option<String>,
    pub input_parameters: Option<serde_json::Value>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields accepted when creating a snippet.
///
/// `id`, `title`, `code` and `language` are required; a payload missing
/// any of them fails deserialization and the handler surfaces the
/// decoder's message as a generic server error. Omitted timestamps
/// fall back to the server clock.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSnippet {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub code: String,
    pub language: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub namespace_id: Option<String>,
    #[serde(default)]
    pub has_preview: bool,
    #[serde(default)]
    pub function_name: Option<String>,
    #[serde(default)]
    pub input_parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// Fields accepted when replacing a snippet.
///
/// Full replace of every mutable column; `id` and `createdAt` are
/// immutable and not part of the payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetUpdate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub code: String,
    pub language: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub namespace_id: Option<String>,
    #[serde(default)]
    pub has_preview: bool,
    #[serde(default)]
    pub function_name: Option<String>,
    #[serde(default)]
    pub input_parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// Encode `inputParameters` for storage.
///
/// `None` and JSON `null` both persist as SQL NULL, matching the read
/// path where an empty column comes back as an absent value.
pub fn encode_input_parameters(value: Option<&serde_json::Value>) -> Option<String> {
    value
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
}
