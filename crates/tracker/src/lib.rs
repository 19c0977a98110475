//! Checking a watchlist of serialized works for newly published episodes.
//!
//! [`Tracker::check`] drives a run: every URL is classified and handed to its
//! publisher's adapter concurrently, the results are reconciled against the
//! persisted state in watchlist order, and a [`Report`] of updates and
//! per-URL failures comes back. [`StatusView`] renders the state without
//! fetching anything.

pub mod error;
mod report;
mod run;
mod source;
mod status;
pub mod watchlist;

pub use crate::report::{Report, UrlError};
pub use crate::run::Tracker;
pub use crate::source::fetch_latest;
pub use crate::status::StatusView;
