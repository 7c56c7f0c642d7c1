//! HTTP page fetcher shared by the listing scraper and the review extractor.

use std::time::Duration;

use reqwest::Client;
use scraper::Html;
use serde::de::DeserializeOwned;

use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

/// Fetches storefront pages and widget payloads.
///
/// Every call re-fetches; nothing is cached. Transport failures are retried
/// with exponential backoff up to `max_retries` additional attempts. A non-2xx
/// status is returned as [`ScraperError::UnexpectedStatus`] without retrying.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in milliseconds: `backoff_base_ms * 2^attempt`.
    backoff_base_ms: u64,
}

impl PageFetcher {
    /// Creates a `PageFetcher` with the given timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// GETs `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`]: transport failure after all retries exhausted.
    /// - [`ScraperError::UnexpectedStatus`]: any non-2xx status (not retried).
    pub async fn fetch_text(&self, url: &str) -> Result<String, ScraperError> {
        tracing::debug!(url, "requesting page");

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .get(url)
                .header(
                    reqwest::header::ACCEPT,
                    "text/html,application/json;q=0.9,*/*;q=0.8",
                )
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }

    /// GETs `url` and parses the body into a queryable HTML document.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_text`].
    pub async fn fetch_document(&self, url: &str) -> Result<Html, ScraperError> {
        let body = self.fetch_text(url).await?;
        Ok(Html::parse_document(&body))
    }

    /// GETs `url` and deserializes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_text`], plus [`ScraperError::Deserialize`] when
    /// the body is not the expected JSON shape (not retried).
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T, ScraperError> {
        let body = self.fetch_text(url).await?;
        serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
            context: format!("{context} from {url}"),
            source,
        })
    }
}
