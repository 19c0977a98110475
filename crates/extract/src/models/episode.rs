use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Auxiliary field: the series code or work key the episode belongs to.
pub const SERIES: &str = "series";
/// Auxiliary field: the complete `<title>` of the episode page.
pub const PAGE_TITLE: &str = "pageTitle";
/// Auxiliary field: publication timestamp reported by the site.
pub const PUBLISHED_AT: &str = "publishedAt";

/// A snapshot of the newest episode of a work, as observed right now.
///
/// Every adapter produces the same shape; anything adapter-specific goes into
/// [`extra`](Self::extra) and is carried through persistence untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestEpisode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_title: Option<String>,
    /// Stable identifier of the episode within its site. Absent when the site
    /// exposes no structured id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_code: Option<String>,
    /// Canonical page for this episode.
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
impl LatestEpisode {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_series_title(mut self, title: Option<String>) -> Self {
        self.series_title = title;
        self
    }

    pub fn with_episode_title(mut self, title: Option<String>) -> Self {
        self.episode_title = title;
        self
    }

    pub fn with_episode_code(mut self, code: impl Into<String>) -> Self {
        self.episode_code = Some(code.into());
        self
    }

    /// Sets an auxiliary field; `None` leaves the record untouched.
    pub fn with_extra(mut self, key: &str, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.extra.insert(key.to_string(), Value::String(value.into()));
        }
        self
    }

    /// Reads an auxiliary field, if it holds a string.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}
