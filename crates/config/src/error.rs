//! Config Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ErrorKind {
    /// An explicitly requested config file does not exist.
    #[display("config file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// A layer could not be parsed into the expected shape.
    #[display("could not load configuration")]
    Load,
    /// Values parsed, but are unusable.
    #[display("invalid configuration: {_0}")]
    Invalid(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
