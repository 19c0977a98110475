use mwatch_state::UpdateEvent;
use serde::Serialize;

/// A watchlist entry that could not be checked this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlError {
    pub url: String,
    pub error: String,
}

/// Outcome of one run, in watchlist order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub updates: Vec<UpdateEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<UrlError>,
}
impl Report {
    /// Single-line JSON, non-ASCII kept as-is.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
