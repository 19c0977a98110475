//! State Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A state error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for state operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every one of these is fatal to a run: state is never partially trusted.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ErrorKind {
    /// The state file exists but could not be read.
    #[display("could not read state file: {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// The state file is not valid state JSON.
    #[display("state file is corrupt: {}", _0.display())]
    Corrupt(#[error(not(source))] PathBuf),
    /// The state file was written by a newer mwatch.
    #[display("state file version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    /// The state file could not be written or swapped into place.
    #[display("could not write state file: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Read(_) | Self::Write(_))
    }
}
