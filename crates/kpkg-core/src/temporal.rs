//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, the UTC timestamp used for the `spec.created` field
//! of package documents.
//!
//! ## Invariant
//!
//! Timestamps are always UTC with a `Z` suffix, truncated to seconds
//! precision. A local-offset timestamp would make otherwise identical
//! documents render differently, so non-UTC inputs are rejected at parse
//! time rather than silently converted.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::KpkgError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// Canonical string form: `YYYY-MM-DDTHH:MM:SSZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string. Only the `Z` suffix is accepted — explicit
    /// offsets are rejected even when they are semantically UTC.
    pub fn parse(s: &str) -> Result<Self, KpkgError> {
        if !s.ends_with('Z') {
            return Err(KpkgError::Encoding(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| KpkgError::Encoding(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Canonical ISO 8601 string: `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
