//! The only place mwatch touches the network.
//!
//! Everything above this crate talks to a [`Fetcher`], so adapters and the
//! run coordinator can be exercised against a [`MockFetcher`] in tests.

pub mod error;
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use crate::http::HttpFetcher;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockFetcher;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type FetcherHandle = Arc<dyn Fetcher + Send + Sync>;

/// Retrieves the body of a page as text.
///
/// Implementations fail on any non-success status, on timeout and on transport
/// failure. They never retry.
///
/// # Examples
///
/// ```
/// use mwatch_fetch::{Fetcher, error::Result};
///
/// async fn title_length(fetcher: &dyn Fetcher, url: &str) -> Result<usize> {
///     let body = fetcher.fetch(url).await?;
///     Ok(body.find("</title>").unwrap_or(0))
/// }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Name of the implementation (used for logging only).
    fn name(&self) -> &str;

    /// Fetch `url` and return its body decoded as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}
