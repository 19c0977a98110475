//! Command-line arguments.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Check a watchlist of manga and web fiction for newly published episodes.
///
/// Prints a JSON report of updates and per-URL errors to stdout. Logs go to
/// stderr.
#[derive(Debug, Clone, Parser)]
#[command(name = "mwatch", version, about, long_about = None)]
pub struct Cli {
    /// Watchlist file: one URL per line, blank lines and `#` comments ignored.
    #[arg(value_name = "URLS_FILE", required_unless_present = "status")]
    pub urls_file: Option<PathBuf>,

    /// Show what is being tracked and exit, without fetching anything.
    #[arg(long)]
    pub status: bool,

    /// Number of watchlist entries checked concurrently.
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// State file location.
    #[arg(long, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Config file (TOML). Defaults to the per-user config file, if any.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level. Without it, `MANGA_WATCH_LOG` or `warn` applies.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}
