//! Timestamp helpers for log entries, reports and generated identifiers.

use chrono::{DateTime, Utc};

/// Represents a timestamp that can be serialized/deserialized.
pub type Timestamp = DateTime<Utc>;

/// Returns the current UTC time as a naive ISO 8601 string.
///
/// The format is `YYYY-MM-DDTHH:MM:SS.ffffff` with no offset suffix, which
/// is what the JSONL log and the HTTP payloads carry.
///
/// # Examples
///
/// ```
/// use sentinexuls::utils::iso_timestamp;
///
/// let ts = iso_timestamp();
/// assert!(ts.contains('T'));
/// assert!(!ts.ends_with('Z'));
/// ```
#[must_use]
pub fn iso_timestamp() -> String {
    format_iso(&now_utc())
}

/// Formats a timestamp the same way as [`iso_timestamp`].
#[must_use]
pub fn format_iso(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Returns the current UTC timestamp.
#[must_use]
pub fn now_utc() -> Timestamp {
    Utc::now()
}

/// Builds a time-stamped identifier such as `SIM-20250605-091500`.
#[must_use]
pub fn stamped_id(prefix: &str, ts: &Timestamp) -> String {
    format!("{prefix}-{}", ts.format("%Y%m%d-%H%M%S"))
}
