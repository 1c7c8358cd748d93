//! Requested time ranges over the device timeline.

use chrono::{DateTime, Utc};

/// An inclusive time range `[from, to]` in UTC.
///
/// Callers are expected to pass `from <= to`; the pair is not
/// reordered or validated here, and an inverted window simply yields
/// whatever the remote returns for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Start of the range.
    pub from: DateTime<Utc>,
    /// End of the range.
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window from two UTC instants.
    #[must_use]
    pub const fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }
}
