mod cli;
mod error;
mod logging;

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::{OptionExt, ResultExt};
use mwatch_config::{Config, Overrides};
use mwatch_fetch::HttpFetcher;
use mwatch_state::StateStore;
use mwatch_tracker::{StatusView, Tracker, watchlist};
use std::process::ExitCode;
use std::sync::Arc;
use time::UtcDateTime;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(err.exit_code())
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        state_path: cli.state,
        jobs: cli.jobs,
    };
    let config = Config::load(cli.config.as_deref(), &overrides).or_raise(|| ErrorKind::Config)?;
    debug!(?config, "loaded configuration");
    let store = StateStore::new(&config.state_path);

    if cli.status {
        let view = StatusView::load(&store).or_raise(|| ErrorKind::Run)?;
        print!("{view}");
        return Ok(());
    }

    let path = cli.urls_file.ok_or_raise(|| ErrorKind::Usage("a watchlist file is required"))?;
    let urls = watchlist::read(&path).or_raise(|| ErrorKind::Run)?;
    let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout()).or_raise(|| ErrorKind::Client)?;
    let tracker = Tracker::new(Arc::new(fetcher), store)
        .with_jobs(config.jobs)
        .with_max_hops(config.max_hops);

    let report = tracker.check(&urls, UtcDateTime::now().unix_timestamp()).await.or_raise(|| ErrorKind::Run)?;
    println!("{}", report.to_json().or_raise(|| ErrorKind::Report)?);
    Ok(())
}
