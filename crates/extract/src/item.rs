//! Classification of watchlist URLs into trackable items.

use exn::OptionExt;
use tracing::instrument;

use crate::consts;
use crate::error::{ErrorKind, Result};

/// Which adapter is responsible for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Series page with an embedded JSON catalog of episode codes.
    CatalogSeries,
    /// Episode reader pages linked by "next readable episode" pointers.
    RedirectChainEpisode,
    /// Work page with an embedded JSON feed of dated episodes.
    JsonFeedWork,
}

/// One watched work, derived from its watchlist URL without any network access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrackingItem {
    CatalogSeries {
        /// Series code, for example `KC_003913_S`.
        series_code: String,
    },
    RedirectChainEpisode {
        /// The episode the chain of "next" pointers starts from.
        episode_url: String,
    },
    JsonFeedWork {
        work_id: String,
    },
}
impl TrackingItem {
    /// Classifies a raw URL. See [`classify`].
    pub fn classify(url: &str) -> Result<Self> {
        let url = url.trim();
        if let Some(captures) = consts::CATALOG_EPISODE_URL_REGEX.captures(url) {
            let series_code = captures
                .get(1)
                .map(|m| m.as_str())
                .filter(|code| consts::SERIES_CODE_REGEX.is_match(code))
                .ok_or_raise(|| ErrorKind::UnparsableUrl {
                    field: "series code",
                    url: url.to_string(),
                })?;
            return Ok(Self::CatalogSeries {
                series_code: series_code.to_string(),
            });
        }
        if consts::REDIRECT_EPISODE_URL_REGEX.is_match(url) {
            return Ok(Self::RedirectChainEpisode {
                episode_url: url.to_string(),
            });
        }
        if consts::FEED_EPISODE_PATH_REGEX.is_match(url) {
            let work_id = consts::FEED_EPISODE_URL_REGEX
                .captures(url)
                .and_then(|captures| captures.get(1))
                .ok_or_raise(|| ErrorKind::UnparsableUrl {
                    field: "work/episode id",
                    url: url.to_string(),
                })?;
            return Ok(Self::JsonFeedWork {
                work_id: work_id.as_str().to_string(),
            });
        }
        exn::bail!(ErrorKind::UnsupportedUrl(url.to_string()));
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::CatalogSeries { .. } => SourceKind::CatalogSeries,
            Self::RedirectChainEpisode { .. } => SourceKind::RedirectChainEpisode,
            Self::JsonFeedWork { .. } => SourceKind::JsonFeedWork,
        }
    }

    /// The key this item is stored under in persisted state.
    ///
    /// Redirect-chain URLs carry no series identifier, so the episode URL
    /// itself is the key; two different starting episodes of the same work
    /// are therefore tracked separately.
    pub fn identity_key(&self) -> String {
        match self {
            Self::CatalogSeries { series_code } => series_code.clone(),
            Self::RedirectChainEpisode { episode_url } => episode_url.clone(),
            Self::JsonFeedWork { work_id } => format!("work:{work_id}"),
        }
    }
}

/// Classifies a raw watchlist URL into a [`TrackingItem`].
///
/// Pure and deterministic: the identity key is derived from the URL alone.
///
/// # Errors
///
/// - [`ErrorKind::UnparsableUrl`] if the URL belongs to a supported publisher
///   but its identifiers cannot be read.
/// - [`ErrorKind::UnsupportedUrl`] for every other URL shape.
///
/// # Examples
///
/// ```rust
/// use mwatch_extract::{SourceKind, classify};
/// let item = classify("https://comic-walker.com/detail/KC_003913_S/episodes/KC_0039130000200011_E").unwrap();
/// assert_eq!(item.kind(), SourceKind::CatalogSeries);
/// assert_eq!(item.identity_key(), "KC_003913_S");
/// ```
#[instrument(level = "trace")]
pub fn classify(url: &str) -> Result<TrackingItem> {
    TrackingItem::classify(url)
}
