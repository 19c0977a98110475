//! Feed site: work pages embed a normalized JSON cache of dated episodes.

use exn::OptionExt;
use serde_json::Value;
use tracing::instrument;

use super::Titles;
use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::page::{find_first, find_key};

/// One episode entry found in a work page payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEpisode {
    pub id: String,
    pub title: String,
    /// ISO-8601 UTC timestamp (`2026-01-27T08:00:03Z`); sorts correctly as text.
    pub published_at: String,
}

pub fn work_url(work_id: &str) -> String {
    format!("{}/works/{work_id}", consts::FEED_BASE)
}

pub fn episode_url(work_id: &str, episode_id: &str) -> String {
    format!("{}/works/{work_id}/episodes/{episode_id}", consts::FEED_BASE)
}

/// Scans the raw payload text for episode entries, in the order they appear.
pub fn episodes(payload: &str) -> Vec<FeedEpisode> {
    consts::FEED_EPISODE_REGEX
        .captures_iter(payload)
        .filter_map(|captures| {
            Some(FeedEpisode {
                id: captures.get(2)?.as_str().to_string(),
                title: unescape(captures.get(3)?.as_str()),
                published_at: captures.get(4)?.as_str().to_string(),
            })
        })
        .collect()
}

/// Picks the most recently published episode.
///
/// When several episodes share the greatest timestamp, the one appearing last
/// in the payload wins. The payload order is whatever the site serialized, so
/// that choice is effectively arbitrary.
///
/// # Errors
///
/// [`ErrorKind::MissingField`] if the payload has no episode entries.
#[instrument(level = "trace", skip(payload), fields(payload_size = payload.len()))]
pub fn latest_episode(payload: &str) -> Result<FeedEpisode> {
    // `max_by` returns the last of several equal maxima.
    episodes(payload)
        .into_iter()
        .max_by(|a, b| a.published_at.cmp(&b.published_at))
        .ok_or_raise(|| ErrorKind::MissingField("episodes"))
}

/// Parses an episode page title of the form `エピソード - 作品名（作者） - サイト`.
///
/// Without a `" - "` separator nothing can be read.
pub fn parse_title(title: &str) -> Titles {
    if !title.contains(" - ") {
        return Titles::default();
    }
    let mut parts = title.split(" - ").map(str::trim);
    let episode = parts.next();
    let series = parts.next();
    Titles::new(series, episode)
}

/// Looks up the work's own title in the payload, under its `Work:<id>` entry.
pub fn work_title(payload: &str, work_id: &str) -> Option<String> {
    let value: Value = serde_json::from_str(payload).ok()?;
    let work = find_key(&value, &format!("Work:{work_id}"))?;
    find_first(work, &["title"]).map(str::to_string)
}

/// Decodes JSON string escapes captured from raw payload text.
fn unescape(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}
