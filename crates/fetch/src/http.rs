//! HTTP fetcher backed by `reqwest`.

use crate::Fetcher;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches pages over HTTP(S) with a fixed user agent and per-request timeout.
///
/// Cloning is cheap; the underlying connection pool is shared.
///
/// # Examples
///
/// ```no_run
/// use mwatch_fetch::HttpFetcher;
/// use std::time::Duration;
///
/// # fn example() -> mwatch_fetch::error::Result<()> {
/// let fetcher = HttpFetcher::new("Mozilla/5.0", Duration::from_secs(25))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}
impl HttpFetcher {
    /// Build a fetcher.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Client`] if the user agent is not a valid header value or
    /// the TLS backend cannot be initialised.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ErrorKind::transport(url, err))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await.map_err(|err| ErrorKind::transport(url, err))?;
        debug!(bytes = body.len(), "fetched page");
        Ok(body)
    }
}
