//! In-memory fetcher for testing.

use crate::Fetcher;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
enum Response {
    Body(String),
    Status(u16),
    Timeout,
}

/// In-memory fetcher for testing.
///
/// Serves canned bodies keyed by exact URL and records every request, so tests
/// can assert on what was fetched and in which order. Unknown URLs answer with
/// HTTP 404.
///
/// # Examples
///
/// ```
/// use mwatch_fetch::{Fetcher, MockFetcher};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = MockFetcher::with_pages([
///     ("https://example.com/a", "<title>A</title>"),
/// ]);
/// assert_eq!(fetcher.fetch("https://example.com/a").await?, "<title>A</title>");
/// assert!(fetcher.fetch("https://example.com/b").await.is_err());
/// assert_eq!(fetcher.requests().await.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, Response>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a mock fetcher pre-populated with page bodies.
    pub fn with_pages(pages: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        let responses = pages
            .into_iter()
            .map(|(url, body)| (url.into(), Response::Body(body.into())))
            .collect();
        Self {
            responses,
            requests: Mutex::default(),
        }
    }

    /// Add (or replace) a page body.
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), Response::Body(body.into()));
        self
    }

    /// Make `url` answer with a non-success status.
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Response::Status(status));
        self
    }

    /// Make `url` time out.
    pub fn with_timeout(mut self, url: impl Into<String>) -> Self {
        self.responses.insert(url.into(), Response::Timeout);
        self
    }

    /// Every URL requested so far, in request order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        self.requests.lock().await.push(url.to_string());
        match self.responses.get(url).cloned() {
            Some(Response::Body(body)) => Ok(body),
            Some(Response::Status(status)) => exn::bail!(ErrorKind::Status {
                url: url.to_string(),
                status,
            }),
            Some(Response::Timeout) => exn::bail!(ErrorKind::Timeout(url.to_string())),
            None => exn::bail!(ErrorKind::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_pages_and_records_requests() {
        let fetcher = MockFetcher::with_pages([("https://a.test/1", "one")]).with_page("https://a.test/2", "two");
        assert_eq!(fetcher.fetch("https://a.test/2").await.unwrap(), "two");
        assert_eq!(fetcher.fetch("https://a.test/1").await.unwrap(), "one");
        assert_eq!(fetcher.requests().await, ["https://a.test/2", "https://a.test/1"]);
    }

    #[tokio::test]
    async fn test_failures() {
        let fetcher = MockFetcher::default()
            .with_status("https://a.test/gone", 410)
            .with_timeout("https://a.test/slow");
        let err = fetcher.fetch("https://a.test/gone").await.unwrap_err();
        assert_eq!(
            *err,
            ErrorKind::Status {
                url: "https://a.test/gone".to_string(),
                status: 410
            }
        );
        let err = fetcher.fetch("https://a.test/slow").await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Timeout(_)));
        let err = fetcher.fetch("https://a.test/unknown").await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Status { status: 404, .. }));
    }
}
