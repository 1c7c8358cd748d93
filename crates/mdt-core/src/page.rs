//! The decoded unit of the paged timeline response.

use serde::Deserialize;
use serde_json::Value;

/// One page of timeline events as returned by the remote API.
///
/// Events and partial-failure reasons are opaque records; nothing in
/// this crate inspects their shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    /// Events in response order.
    #[serde(default, rename = "Items")]
    pub items: Vec<Value>,

    /// Remote-declared reasons why this page is known-incomplete.
    #[serde(default, rename = "PartialResponseReasons")]
    pub partial_response_reasons: Vec<Value>,

    /// Link to the chronologically earlier adjacent page.
    #[serde(default, rename = "Prev", deserialize_with = "empty_as_none")]
    pub prev: Option<String>,

    /// Link to the chronologically later adjacent page.
    #[serde(default, rename = "Next", deserialize_with = "empty_as_none")]
    pub next: Option<String>,
}

impl Page {
    /// True when the remote flagged this page as incomplete.
    #[must_use]
    pub fn has_partial_data(&self) -> bool {
        !self.partial_response_reasons.is_empty()
    }
}

/// The remote sends `""` for a missing pagination link at least as
/// often as it omits the field.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|cursor| !cursor.is_empty()))
}
