//! Top-level Error Types

use derive_more::{Display, Error};

/// A top-level error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for the binary.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Arguments parsed but cannot be acted on.
    #[display("usage error: {_0}")]
    Usage(#[error(not(source))] &'static str),
    #[display("configuration error")]
    Config,
    #[display("could not set up page fetching")]
    Client,
    /// Watchlist or state failure; nothing was reported.
    #[display("run aborted")]
    Run,
    #[display("could not render report")]
    Report,
}

impl ErrorKind {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}
