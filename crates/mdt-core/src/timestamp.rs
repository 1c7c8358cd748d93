//! The wire timestamp format used by the timeline API.
//!
//! The remote renders instants as `2024-01-02T15:04:05.1234567Z`: UTC,
//! a literal `Z`, and up to seven fractional digits with trailing
//! zeros trimmed. The fraction is optional in both directions.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

/// Format string for timestamps in query parameters and cursors.
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Renders an instant in the wire format.
///
/// Values are truncated to microsecond precision first, so the emitted
/// fraction never exceeds the seven digits the remote accepts.
pub fn format(ts: DateTime<Utc>) -> String {
    ts.trunc_subsecs(6).format(FORMAT).to_string()
}

/// Parses an instant in the wire format.
///
/// The `Z` suffix is required; the fraction may carry up to nine
/// digits or be absent entirely.
pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, FORMAT).map(|naive| naive.and_utc())
}
