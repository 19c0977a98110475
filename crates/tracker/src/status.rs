//! Read-only summary of what is being tracked. Never touches the network.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use mwatch_state::{StateFile, StateStore};
use std::fmt;
use time::UtcDateTime;
use time::format_description::well_known::Rfc3339;

/// Renders a [`StateFile`] for humans via [`Display`](fmt::Display).
#[derive(Debug, Clone)]
pub struct StatusView {
    state: StateFile,
}
impl StatusView {
    pub fn new(state: StateFile) -> Self {
        Self { state }
    }

    /// Load the current state without modifying it.
    pub fn load(store: &StateStore) -> Result<Self> {
        Ok(Self::new(store.load().or_raise(|| ErrorKind::State)?))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn timestamp(seconds: i64) -> Option<UtcDateTime> {
    (seconds > 0).then(|| UtcDateTime::from_unix_timestamp(seconds).ok()).flatten()
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = &self.state.items;
        if items.is_empty() {
            return writeln!(f, "No tracked works.");
        }
        writeln!(f, "Tracked works ({}):", items.len())?;
        for (key, entry) in items {
            let latest = &entry.latest;
            let series = non_empty(latest.series_title.as_deref()).unwrap_or(key);
            let episode = non_empty(latest.episode_title.as_deref())
                .or_else(|| non_empty(latest.episode_code.as_deref()))
                .unwrap_or("?");
            match timestamp(entry.seen_at) {
                Some(seen) => writeln!(f, "  {series}\t{episode}\t({})", seen.date())?,
                None => writeln!(f, "  {series}\t{episode}\t(?)")?,
            }
        }
        if let Some(last_run) = self.state.last_run_at.and_then(timestamp) {
            let formatted = last_run.format(&Rfc3339).map_err(|_| fmt::Error)?;
            writeln!(f, "Last run: {formatted}")?;
        }
        Ok(())
    }
}
