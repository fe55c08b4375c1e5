//! Timestamp handling for API payloads
//!
//! Clients send timestamps either as epoch milliseconds or as an
//! ISO-8601 / RFC 3339 string. Storage always holds epoch milliseconds.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamp as accepted in request payloads.
///
/// Deserializes from either a JSON number (epoch milliseconds) or a
/// string (RFC 3339, `Z` suffix included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    /// Normalize to epoch milliseconds
    pub fn to_millis(&self) -> Result<i64> {
        match self {
            Timestamp::Millis(ms) => Ok(*ms),
            Timestamp::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.timestamp_millis())
                .map_err(|e| Error::InvalidTimestamp(format!("{}: {}", s, e))),
        }
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Normalize an optional payload timestamp, falling back to now
pub fn millis_or_now(ts: Option<&Timestamp>) -> Result<i64> {
    match ts {
        Some(t) => t.to_millis(),
        None => Ok(now_millis()),
    }
}
