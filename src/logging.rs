//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for the filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `MANGA_WATCH_LOG` environment variable (any `EnvFilter` directive)
//! 3. `warn`
//!
//! Output goes to stderr; stdout is reserved for the report.

use crate::cli::LogLevel;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MANGA_WATCH_LOG";

/// Install the global subscriber. Call once, at startup.
pub fn init(cli_level: Option<LogLevel>) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(cli_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn filter(cli_level: Option<LogLevel>) -> EnvFilter {
    match cli_level {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(LogLevel::Warn.as_str())),
    }
}
