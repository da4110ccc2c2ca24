use crate::config::FetchConfig;
use crate::error::{Result, ScraperError};
use std::time::Duration;
use tracing::{debug, warn};

/// Shared HTTP client with a per-request timeout and bounded retries.
/// Every fetch in the pipeline goes through here so a hung source turns
/// into a fetch failure instead of a stalled run.
pub struct HttpFetcher {
    client: reqwest::Client,
    retries: u32,
    backoff: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, retries: u32, backoff: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            retries,
            backoff,
        })
    }

    pub fn from_config(fetch: &FetchConfig) -> Result<Self> {
        Self::new(
            Duration::from_secs(fetch.timeout_seconds),
            fetch.retries,
            Duration::from_millis(fetch.backoff_ms),
        )
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get_checked(url).await?;
        Ok(response.text().await?)
    }

    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.get_checked(url).await?;
        Ok(response.json().await?)
    }

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response> {
        let mut attempt = 0;
        loop {
            match self.try_get(url).await {
                Ok(response) => {
                    debug!("GET {} succeeded on attempt {}", url, attempt + 1);
                    return Ok(response);
                }
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        "GET {} failed (attempt {}/{}), retrying: {}",
                        url,
                        attempt,
                        self.retries + 1,
                        e
                    );
                    tokio::time::sleep(self.backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Api {
                message: format!("GET {} returned status {}", url, status.as_u16()),
            });
        }
        Ok(response)
    }
}
