use crate::error::{ErrorKind, Result};
use mwatch_extract::LatestEpisode;
use mwatch_extract::models::{PUBLISHED_AT, SERIES};
use mwatch_extract::page::{embedded_payload, html_title};
use mwatch_extract::sites::feed;
use mwatch_fetch::Fetcher;
use tracing::instrument;

/// Work page payload → most recently published episode → episode page title.
#[instrument(level = "debug", skip(fetcher))]
pub(super) async fn fetch_latest(fetcher: &dyn Fetcher, work_id: &str) -> Result<LatestEpisode> {
    let html = fetcher.fetch(&feed::work_url(work_id)).await.map_err(ErrorKind::fetch)?;
    let payload = embedded_payload(&html).ok_or_else(|| ErrorKind::missing("payload"))?;
    let episode = feed::latest_episode(&payload).map_err(ErrorKind::extraction)?;
    let url = feed::episode_url(work_id, &episode.id);

    let page = fetcher.fetch(&url).await.map_err(ErrorKind::fetch)?;
    let titles = html_title(&page).map(|title| feed::parse_title(&title)).unwrap_or_default();
    let series_title = titles.series.or_else(|| feed::work_title(&payload, work_id));
    let episode_title = titles.episode.unwrap_or(episode.title);

    Ok(LatestEpisode::new(url)
        .with_series_title(series_title)
        .with_episode_title(Some(episode_title).filter(|t| !t.is_empty()))
        .with_episode_code(episode.id)
        .with_extra(SERIES, Some(format!("work:{work_id}")))
        .with_extra(PUBLISHED_AT, Some(episode.published_at)))
}
