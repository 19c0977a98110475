//! Tracker Error Types
//!
//! Two families live here. Per-URL errors ([`Classify`](ErrorKind::Classify),
//! [`Fetch`](ErrorKind::Fetch), [`Extraction`](ErrorKind::Extraction)) end up
//! in the run report and never stop a run. Run errors
//! ([`Watchlist`](ErrorKind::Watchlist), [`State`](ErrorKind::State)) abort
//! it before anything is reported.

use derive_more::{Display, Error};
use mwatch_extract::error::{Error as ExtractError, ErrorKind as ExtractErrorKind};
use mwatch_fetch::error::{Error as FetchError, ErrorKind as FetchErrorKind};
use std::path::PathBuf;

/// A tracker error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ErrorKind {
    /// The URL belongs to no supported publisher, or its identifiers are mangled.
    #[display("{_0}")]
    Classify(ExtractErrorKind),
    /// A page could not be retrieved.
    #[display("fetch failed: {_0}")]
    Fetch(FetchErrorKind),
    /// A page was retrieved but did not have the expected structure.
    #[display("extraction failed: {_0}")]
    Extraction(ExtractErrorKind),
    /// The watchlist file could not be read.
    #[display("could not read watchlist: {}", _0.display())]
    Watchlist(#[error(not(source))] PathBuf),
    /// Loading or saving the state file failed.
    #[display("state file unavailable")]
    State,
}
impl ErrorKind {
    #[track_caller]
    pub fn classify(err: ExtractError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Classify(inner))
    }

    #[track_caller]
    pub fn fetch(err: FetchError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Fetch(inner))
    }

    #[track_caller]
    pub fn extraction(err: ExtractError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Extraction(inner))
    }

    /// A page lacked `field`, with no underlying error to attach.
    #[track_caller]
    pub fn missing(field: &'static str) -> Error {
        exn::Exn::from(ErrorKind::Extraction(ExtractErrorKind::MissingField(field)))
    }

    /// `true` for errors that only affect a single watchlist entry.
    pub fn is_per_url(&self) -> bool {
        matches!(self, Self::Classify(_) | Self::Fetch(_) | Self::Extraction(_))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(inner) => inner.is_retryable(),
            _ => false,
        }
    }
}
