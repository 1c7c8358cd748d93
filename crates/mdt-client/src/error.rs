//! Error taxonomy for the timeline client.

use mdt_core::CursorError;
use serde_json::Value;
use thiserror::Error;

/// Timeline client errors.
///
/// Construction failures come first; the remaining variants are
/// terminal walk errors, each of which ends the event stream.
#[derive(Debug, Error)]
pub enum Error {
    /// The provided cookie header was unusable.
    #[error("invalid cookie header: {reason}")]
    InvalidCookie { reason: &'static str },

    /// The provided anti-forgery token was unusable.
    #[error("invalid anti-forgery token: {reason}")]
    InvalidToken { reason: &'static str },

    /// The configured base URL was rejected.
    #[error("invalid base URL: {reason}")]
    BaseUrl { reason: String },

    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request kept failing at the transport level.
    #[error("request failed after {attempts} attempts: {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// The remote completed the exchange with a non-success status.
    /// Never retried.
    #[error("bad status: {status}: {detail}")]
    Status {
        status: reqwest::StatusCode,
        detail: String,
    },

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The response body was not a timeline page.
    #[error("failed to decode timeline page: {0}")]
    Page(#[from] serde_json::Error),

    /// A pagination link could not be decoded.
    #[error(transparent)]
    Cursor(#[from] CursorError),

    /// The remote declared the page's data known-incomplete.
    #[error("partial data: {}", render_reasons(.0))]
    PartialData(Vec<Value>),
}

fn render_reasons(reasons: &[Value]) -> String {
    Value::Array(reasons.to_vec()).to_string()
}
