//! Folding a fresh observation into what was previously persisted.

use crate::store::PersistedEntry;
use mwatch_extract::LatestEpisode;
use mwatch_extract::models::PAGE_TITLE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map::Entry;

/// Auxiliary fields that follow the site's current wording, like the titles.
const TITLE_EXTRAS: [&str; 1] = [PAGE_TITLE];

/// A tracked work advanced from one episode to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEvent {
    /// Identity key of the work.
    pub id: String,
    pub from: LatestEpisode,
    pub to: LatestEpisode,
}

/// Decide what to persist for one work after observing `fresh` at `now`.
///
/// - No previous entry: `fresh` becomes the baseline and no event is emitted.
/// - A different episode: `fresh` replaces the previous record and an
///   [`UpdateEvent`] is emitted.
/// - The same episode: the previous record is kept and enriched from `fresh`.
///   Titles take the fresh wording when it is non-empty; every other field is
///   only filled in where the previous record has nothing.
///
/// `seen_at` always becomes `now`. Applying the same `fresh` twice yields no
/// event the second time and the same record.
///
/// # Examples
///
/// ```
/// use mwatch_extract::LatestEpisode;
/// use mwatch_state::reconcile;
///
/// let first = LatestEpisode::new("https://example.com/1").with_episode_code("E1");
/// let (entry, event) = reconcile("work", None, first, 100);
/// assert!(event.is_none());
///
/// let second = LatestEpisode::new("https://example.com/2").with_episode_code("E2");
/// let (entry, event) = reconcile("work", Some(entry), second, 200);
/// let event = event.unwrap();
/// assert_eq!(event.from.url, "https://example.com/1");
/// assert_eq!(entry.latest.url, "https://example.com/2");
/// assert_eq!(entry.seen_at, 200);
/// ```
pub fn reconcile(
    id: &str,
    previous: Option<PersistedEntry>,
    fresh: LatestEpisode,
    now: i64,
) -> (PersistedEntry, Option<UpdateEvent>) {
    let Some(previous) = previous else {
        return (PersistedEntry { latest: fresh, seen_at: now }, None);
    };
    if !previous.latest.is_same_episode(&fresh) {
        let event = UpdateEvent {
            id: id.to_string(),
            from: previous.latest,
            to: fresh.clone(),
        };
        return (PersistedEntry { latest: fresh, seen_at: now }, Some(event));
    }
    let merged = merge(previous.latest, fresh);
    (PersistedEntry { latest: merged, seen_at: now }, None)
}

fn merge(mut merged: LatestEpisode, fresh: LatestEpisode) -> LatestEpisode {
    overwrite(&mut merged.series_title, fresh.series_title);
    overwrite(&mut merged.episode_title, fresh.episode_title);
    fill(&mut merged.episode_code, fresh.episode_code);
    if merged.url.is_empty() {
        merged.url = fresh.url;
    }
    for (key, value) in fresh.extra {
        if is_blank(&value) {
            continue;
        }
        let is_title = TITLE_EXTRAS.contains(&key.as_str());
        match merged.extra.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            },
            Entry::Occupied(mut slot) => {
                if is_title || is_blank(slot.get()) {
                    slot.insert(value);
                }
            },
        }
    }
    merged
}

fn overwrite(slot: &mut Option<String>, fresh: Option<String>) {
    if let Some(fresh) = fresh.filter(|v| !v.is_empty()) {
        *slot = Some(fresh);
    }
}

fn fill(slot: &mut Option<String>, fresh: Option<String>) {
    if slot.as_deref().is_none_or(str::is_empty) {
        overwrite(slot, fresh);
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mwatch_extract::models::{PUBLISHED_AT, SERIES};

    fn titled(series: &str, episode: &str, url: &str) -> LatestEpisode {
        LatestEpisode::new(url)
            .with_series_title(Some(series.to_string()))
            .with_episode_title(Some(episode.to_string()))
    }

    fn entry(latest: LatestEpisode, seen_at: i64) -> PersistedEntry {
        PersistedEntry { latest, seen_at }
    }

    #[test]
    fn test_first_observation_is_baseline() {
        let fresh = titled("A", "E1", "u1");
        let (entry, event) = reconcile("k", None, fresh.clone(), 10);
        assert!(event.is_none());
        assert_eq!(entry.latest, fresh);
        assert_eq!(entry.seen_at, 10);
    }

    #[test]
    fn test_new_episode_emits_event() {
        let old = titled("A", "E1", "u1").with_episode_code("C1");
        let fresh = titled("A", "E2", "u2").with_episode_code("C2");
        let (next, event) = reconcile("k", Some(entry(old.clone(), 10)), fresh.clone(), 20);
        assert_eq!(
            event,
            Some(UpdateEvent {
                id: "k".to_string(),
                from: old,
                to: fresh.clone(),
            })
        );
        assert_eq!(next, entry(fresh, 20));
    }

    #[test]
    fn test_idempotent() {
        let fresh = titled("A", "E1", "u1").with_episode_code("C1");
        let (first, _) = reconcile("k", None, fresh.clone(), 10);
        let (second, event) = reconcile("k", Some(first.clone()), fresh.clone(), 20);
        assert!(event.is_none());
        assert_eq!(second.latest, first.latest);
        let (third, event) = reconcile("k", Some(second.clone()), fresh, 30);
        assert!(event.is_none());
        assert_eq!(third.latest, second.latest);
        assert_eq!(third.seen_at, 30);
    }

    #[test]
    fn test_merge_titles_follow_fresh_wording() {
        let previous = titled("A", "", "u1");
        let fresh = titled("B", "E1", "u1");
        let (next, event) = reconcile("k", Some(entry(previous, 10)), fresh, 20);
        assert!(event.is_none());
        assert_eq!(next.latest, titled("B", "E1", "u1"));
        assert_eq!(next.seen_at, 20);
    }

    #[test]
    fn test_merge_keeps_titles_when_fresh_is_empty() {
        let previous = titled("A", "E1", "u1");
        let fresh = LatestEpisode::new("u1").with_series_title(Some(String::new()));
        let (next, _) = reconcile("k", Some(entry(previous.clone(), 10)), fresh, 20);
        assert_eq!(next.latest, previous);
    }

    #[test]
    fn test_merge_fills_only_missing_fields() {
        let previous = LatestEpisode::new("u1")
            .with_episode_code("C1")
            .with_extra(SERIES, Some("S-old"))
            .with_extra(PAGE_TITLE, Some("old page"));
        let fresh = LatestEpisode::new("u-other")
            .with_episode_code("C1")
            .with_extra(SERIES, Some("S-new"))
            .with_extra(PAGE_TITLE, Some("new page"))
            .with_extra(PUBLISHED_AT, Some("2026-01-27T08:00:03Z"));
        let (next, event) = reconcile("k", Some(entry(previous, 10)), fresh, 20);
        assert!(event.is_none(), "same code means same episode despite URL change");
        let latest = next.latest;
        assert_eq!(latest.url, "u1");
        assert_eq!(latest.extra_str(SERIES), Some("S-old"));
        assert_eq!(latest.extra_str(PAGE_TITLE), Some("new page"));
        assert_eq!(latest.extra_str(PUBLISHED_AT), Some("2026-01-27T08:00:03Z"));
    }

    #[test]
    fn test_merge_fills_empty_code() {
        let mut previous = LatestEpisode::new("u1");
        previous.episode_code = Some(String::new());
        let fresh = LatestEpisode::new("u1").with_episode_code("C1");
        let (next, event) = reconcile("k", Some(entry(previous, 10)), fresh, 20);
        assert!(event.is_none());
        assert_eq!(next.latest.episode_code.as_deref(), Some("C1"));
    }

    #[test]
    fn test_url_only_identity() {
        let previous = LatestEpisode::new("https://comic-action.com/episode/1").with_extra(PAGE_TITLE, Some("第1話"));
        let fresh = LatestEpisode::new("https://comic-action.com/episode/2").with_extra(PAGE_TITLE, Some("第2話"));
        let (next, event) = reconcile("k", Some(entry(previous, 10)), fresh.clone(), 20);
        assert!(event.is_some());
        assert_eq!(next.latest, fresh);
    }
}
