use crate::error::{ErrorKind, Result};
use mwatch_extract::LatestEpisode;
use mwatch_extract::models::PAGE_TITLE;
use mwatch_extract::page::html_title;
use mwatch_extract::sites::redirect;
use mwatch_fetch::Fetcher;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Follow "next readable episode" pointers from `start_url` until they run
/// out, loop back on themselves, or `max_hops` pages have been fetched.
///
/// The result is always the last page actually fetched.
#[instrument(level = "debug", skip(fetcher))]
pub(super) async fn fetch_latest(fetcher: &dyn Fetcher, start_url: &str, max_hops: usize) -> Result<LatestEpisode> {
    let mut visited = HashSet::new();
    let mut current = start_url.to_string();
    loop {
        let html = fetcher.fetch(&current).await.map_err(ErrorKind::fetch)?;
        visited.insert(current.clone());
        match redirect::next_readable(&html) {
            Some(next) if next != current && !visited.contains(&next) && visited.len() < max_hops => {
                debug!(from = %current, to = %next, hop = visited.len(), "following next episode pointer");
                current = next;
            },
            next => {
                if let Some(next) = next.filter(|next| *next != current) {
                    debug!(stopped_at = %current, pointer = %next, hops = visited.len(), "chain looped or hit the hop limit");
                }
                let title = html_title(&html);
                let titles = title.as_deref().map(redirect::parse_title).unwrap_or_default();
                return Ok(LatestEpisode::new(current)
                    .with_series_title(titles.series)
                    .with_episode_title(titles.episode)
                    .with_extra(PAGE_TITLE, title));
            },
        }
    }
}
