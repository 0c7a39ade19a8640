//! Epoch timestamp rendering for time-range filters.
//!
//! xDome compares `detected_time` against strings of the form
//! `YYYY-MM-DDTHH:MM:SS.ffffffZ`. The deployed integration renders the
//! wall clock of the local zone and appends a literal `Z`, so that is the
//! default. [`EpochZone::Utc`] renders real UTC instead.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// `strftime` pattern of the rendered timestamp.
pub const EPOCH_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Zone whose wall clock is rendered before the `Z` suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpochZone {
    /// Local wall clock, labelled `Z` (compatible rendering)
    #[default]
    Local,
    /// Actual UTC
    Utc,
}

/// Render a Unix timestamp in seconds.
///
/// Returns `None` if `secs` is outside the representable range.
///
/// # Examples
///
/// ```
/// use xdome_core::{format_epoch, EpochZone};
///
/// let rendered = format_epoch(1_700_000_000, EpochZone::Utc).unwrap();
/// assert_eq!(rendered, "2023-11-14T22:13:20.000000Z");
/// ```
#[must_use]
pub fn format_epoch(secs: i64, zone: EpochZone) -> Option<String> {
    match zone {
        EpochZone::Local => chrono::Local
            .timestamp_opt(secs, 0)
            .single()
            .map(|dt| dt.format(EPOCH_FORMAT).to_string()),
        EpochZone::Utc => Utc
            .timestamp_opt(secs, 0)
            .single()
            .map(|dt| dt.format(EPOCH_FORMAT).to_string()),
    }
}
