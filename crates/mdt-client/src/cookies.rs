//! Parsing of raw browser cookie headers.

use crate::Error;

const HEADER_PREFIX: &str = "Cookie: ";

/// Splits a raw cookie header into its `name=value` pairs.
///
/// Accepts the header with or without the leading `Cookie: ` label, so
/// a line copied wholesale out of browser developer tools works as-is.
/// Malformed fragments between semicolons are skipped; an input
/// yielding no pair at all is an error.
pub fn parse(header: &str) -> Result<Vec<String>, Error> {
    let raw = header.strip_prefix(HEADER_PREFIX).unwrap_or(header);

    let pairs: Vec<String> = raw
        .split(';')
        .filter_map(|fragment| {
            let fragment = fragment.trim();
            let (name, _) = fragment.split_once('=')?;
            if name.trim().is_empty() {
                return None;
            }
            Some(fragment.to_string())
        })
        .collect();

    if pairs.is_empty() {
        return Err(Error::InvalidCookie {
            reason: "no name=value pairs found",
        });
    }
    Ok(pairs)
}
