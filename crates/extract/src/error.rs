//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The URL does not belong to any supported publisher (or not to a page
    /// shape that can be tracked).
    #[display("unsupported URL: {_0}")]
    UnsupportedUrl(#[error(not(source))] String),
    /// The URL belongs to a supported publisher, but the identifying part of
    /// it could not be read.
    #[display("could not parse {field} from URL: {url}")]
    UnparsableUrl {
        /// The identifier that was expected in the URL.
        field: &'static str,
        /// The offending URL.
        url: String,
    },
    /// Expected structure was not found in a fetched page.
    #[display("{_0} not found")]
    MissingField(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A URL either classifies or it doesn't, and the same page markup
        // will fail the same way twice.
        false
    }
}
