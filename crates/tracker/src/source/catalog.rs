use crate::error::{ErrorKind, Result};
use mwatch_extract::LatestEpisode;
use mwatch_extract::models::SERIES;
use mwatch_extract::page::{Page, html_title};
use mwatch_extract::sites::Titles;
use mwatch_extract::sites::catalog;
use mwatch_fetch::Fetcher;
use tracing::{debug, instrument};

/// Series page → newest episode code → episode page title.
#[instrument(level = "debug", skip(fetcher))]
pub(super) async fn fetch_latest(fetcher: &dyn Fetcher, series_code: &str) -> Result<LatestEpisode> {
    let html = fetcher.fetch(&catalog::series_url(series_code)).await.map_err(ErrorKind::fetch)?;
    let (payload, series_page_title) = {
        let page = Page::parse(&html);
        (page.payload(), page.title())
    };
    let payload = payload.ok_or_else(|| ErrorKind::missing("payload"))?;
    let code = catalog::latest_episode_code(&payload, series_code).map_err(ErrorKind::extraction)?;
    let url = catalog::episode_url(series_code, &code);

    let episode_page_title = match fetcher.fetch(&url).await {
        Ok(html) => html_title(&html),
        Err(err) => {
            let reason = (*err).to_string();
            debug!(url = %url, error = %reason, "episode page unavailable");
            None
        },
    };
    let titles = match episode_page_title {
        Some(title) => catalog::parse_title(&title),
        None => {
            debug!("falling back to the series page title");
            let series = series_page_title.map(|title| catalog::parse_title(&title).series);
            Titles {
                series: series.flatten(),
                episode: None,
            }
        },
    };

    Ok(LatestEpisode::new(url)
        .with_series_title(titles.series)
        .with_episode_title(titles.episode)
        .with_episode_code(code)
        .with_extra(SERIES, Some(series_code)))
}
