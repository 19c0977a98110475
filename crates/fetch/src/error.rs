//! Fetch Error Types
//!
//! Structured errors using `exn` for automatic location tracking, in the same
//! shape as every other mwatch crate.

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ErrorKind {
    /// The HTTP client could not be constructed (bad user agent, TLS setup).
    #[display("could not build HTTP client")]
    Client,
    /// The server answered with a non-success status.
    #[display("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },
    /// The per-request timeout elapsed.
    #[display("timed out fetching {_0}")]
    Timeout(#[error(not(source))] String),
    /// Connection, TLS or body decoding failure.
    #[display("network error fetching {_0}")]
    Network(#[error(not(source))] String),
}
impl ErrorKind {
    /// Wrap a transport error, keeping it as a child frame in the error tree.
    #[track_caller]
    pub fn transport(url: &str, err: reqwest::Error) -> Error {
        let kind = if err.is_timeout() {
            Self::Timeout(url.to_string())
        } else {
            Self::Network(url.to_string())
        };
        exn::Exn::from(err).raise(kind)
    }

    /// Returns `true` if retrying might succeed.
    ///
    /// mwatch itself never retries within a run; the next scheduled run is the
    /// retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Client => false,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Timeout(_) | Self::Network(_) => true,
        }
    }
}
