//! Decoding of opaque pagination links.
//!
//! Each link returned by the timeline API points at an adjacent page
//! and embeds that page's own 7-day window as `fromDate`/`toDate`
//! query parameters. The embedded window is the only thing the walker
//! needs from a link; the rest stays opaque and is replayed verbatim.

use thiserror::Error;
use url::Url;

use crate::timestamp;
use crate::window::TimeWindow;

/// Query parameter carrying a page's window start.
pub const PARAM_FROM_DATE: &str = "fromDate";

/// Query parameter carrying a page's window end.
pub const PARAM_TO_DATE: &str = "toDate";

/// Placeholder base for parsing links, which arrive as scheme-less
/// path-and-query references.
const DECODE_BASE: &str = "https://localhost/";

/// Errors produced while decoding a pagination link.
#[derive(Debug, Error)]
pub enum CursorError {
    /// The link was not a parseable URI reference.
    #[error("malformed pagination link: {0}")]
    Malformed(#[from] url::ParseError),

    /// The link did not carry both window parameters.
    #[error("missing time range parameter")]
    MissingTimeRange,

    /// A window parameter did not match the wire timestamp format.
    #[error("invalid timestamp in pagination link: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// Extracts the time window embedded in a pagination link.
pub fn decode(cursor: &str) -> Result<TimeWindow, CursorError> {
    let url = Url::parse(DECODE_BASE).and_then(|base| base.join(cursor))?;
    let from = query_value(&url, PARAM_FROM_DATE).ok_or(CursorError::MissingTimeRange)?;
    let to = query_value(&url, PARAM_TO_DATE).ok_or(CursorError::MissingTimeRange)?;
    Ok(TimeWindow {
        from: timestamp::parse(&from)?,
        to: timestamp::parse(&to)?,
    })
}

/// First occurrence wins when a parameter repeats.
fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
