//! Adapters: one per publisher, each turning a [`TrackingItem`] into the
//! [`LatestEpisode`] currently published for it.

mod catalog;
mod feed;
mod redirect;

use crate::error::Result;
use mwatch_extract::{LatestEpisode, TrackingItem};
use mwatch_fetch::Fetcher;

/// Fetch whatever pages `item`'s publisher needs and extract its newest episode.
///
/// `max_hops` bounds how many pages a redirect chain may fetch.
pub async fn fetch_latest(item: &TrackingItem, fetcher: &dyn Fetcher, max_hops: usize) -> Result<LatestEpisode> {
    match item {
        TrackingItem::CatalogSeries { series_code } => catalog::fetch_latest(fetcher, series_code).await,
        TrackingItem::RedirectChainEpisode { episode_url } => {
            redirect::fetch_latest(fetcher, episode_url, max_hops).await
        },
        TrackingItem::JsonFeedWork { work_id } => feed::fetch_latest(fetcher, work_id).await,
    }
}
