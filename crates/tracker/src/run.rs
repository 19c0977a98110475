//! The run coordinator: check every watchlist entry, reconcile, persist.

use crate::error::{ErrorKind, Result};
use crate::report::{Report, UrlError};
use crate::source;
use exn::ResultExt;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use mwatch_extract::{LatestEpisode, classify};
use mwatch_config::{DEFAULT_JOBS, DEFAULT_MAX_HOPS};
use mwatch_fetch::FetcherHandle;
use mwatch_state::{StateStore, reconcile};
use tracing::{debug, info, instrument, warn};

/// Checks a watchlist against the persisted state.
///
/// One `Tracker` can serve any number of runs, but runs against the same state
/// file must not overlap.
pub struct Tracker {
    fetcher: FetcherHandle,
    store: StateStore,
    jobs: usize,
    max_hops: usize,
}

impl Tracker {
    pub fn new(fetcher: FetcherHandle, store: StateStore) -> Self {
        Self {
            fetcher,
            store,
            jobs: DEFAULT_JOBS,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    /// How many entries are checked concurrently. Clamped to at least one.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Check every URL and commit the outcome at time `now` (unix seconds).
    ///
    /// Pages are fetched concurrently, but reconciliation happens afterwards
    /// in watchlist order, so the report is ordered by watchlist position no
    /// matter which checks finished first. An entry that fails is reported
    /// and keeps its previous state.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::State`] if the state file cannot be loaded or saved. No
    /// per-URL failure is ever returned here.
    #[instrument(level = "info", skip_all, fields(urls = urls.len(), fetcher = self.fetcher.name()))]
    pub async fn check(&self, urls: &[String], now: i64) -> Result<Report> {
        let mut state = self.store.load().or_raise(|| ErrorKind::State)?;
        let observations = self.observe_all(urls).await;

        let mut report = Report::default();
        for (url, observation) in urls.iter().zip(observations) {
            match observation {
                Ok((key, fresh)) => {
                    let previous = state.items.remove(&key);
                    let (entry, event) = reconcile(&key, previous, fresh, now);
                    if let Some(event) = event {
                        info!(id = %event.id, url = %event.to.url, "new episode");
                        report.updates.push(event);
                    }
                    state.items.insert(key, entry);
                },
                Err(err) => {
                    let error = (*err).to_string();
                    warn!(url = %url, error = %error, "check failed");
                    report.errors.push(UrlError { url: url.clone(), error });
                },
            }
        }

        state.finish_run(now);
        self.store.save(&state).or_raise(|| ErrorKind::State)?;
        info!(updates = report.updates.len(), errors = report.errors.len(), "run complete");
        Ok(report)
    }

    /// Runs [`observe`](Self::observe) for every URL, at most `jobs` at a
    /// time, and returns the results in input order.
    async fn observe_all(&self, urls: &[String]) -> Vec<Result<(String, LatestEpisode)>> {
        let workers = self.jobs.clamp(1, urls.len().max(1));
        debug!(workers, "checking watchlist");
        let mut pending = urls
            .iter()
            .enumerate()
            .map(|(index, url)| async move { (index, self.observe(url).await) });
        let mut processing: FuturesUnordered<_> = pending.by_ref().take(workers).collect();
        let mut results: Vec<Option<Result<(String, LatestEpisode)>>> = urls.iter().map(|_| None).collect();
        while let Some((index, result)) = processing.next().await {
            results[index] = Some(result);
            if let Some(next) = pending.next() {
                processing.push(next);
            }
        }
        results.into_iter().flatten().collect()
    }

    /// Classify one URL and fetch its newest episode, keyed by identity key.
    #[instrument(level = "debug", skip(self))]
    async fn observe(&self, url: &str) -> Result<(String, LatestEpisode)> {
        let item = classify(url).map_err(ErrorKind::classify)?;
        debug!(kind = ?item.kind(), key = %item.identity_key(), "classified");
        let latest = source::fetch_latest(&item, self.fetcher.as_ref(), self.max_hops).await?;
        Ok((item.identity_key(), latest))
    }
}
