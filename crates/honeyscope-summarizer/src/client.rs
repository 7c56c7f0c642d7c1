//! Chat completion client for an OpenAI-compatible API.

use std::fmt;
use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::SummarizerError;
use crate::prompt::ChatMessage;
use crate::retry::retry_rate_limited;

/// Body of a `POST {api_base}/chat/completions` request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Sends chat completion requests, retrying when the provider rate limits.
#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    /// Creates a client for `{api_base}/chat/completions`.
    ///
    /// # Errors
    ///
    /// Returns [`SummarizerError::Http`] if the underlying HTTP client cannot
    /// be built.
    pub fn new(
        api_base: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, SummarizerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
            max_retries,
            backoff_base_secs,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Requests one completion and returns the first choice's message text.
    ///
    /// HTTP 429 is retried with exponential back-off up to the configured
    /// retry budget.
    ///
    /// # Errors
    ///
    /// - [`SummarizerError::RateLimited`] once retries are exhausted.
    /// - [`SummarizerError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`SummarizerError::Deserialize`] if the body is not a completion.
    /// - [`SummarizerError::EmptyCompletion`] if no choice carries content.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, SummarizerError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };
        retry_rate_limited(self.max_retries, self.backoff_base_secs, || {
            self.send_once(&request)
        })
        .await
    }

    async fn send_once(&self, request: &CompletionRequest<'_>) -> Result<String, SummarizerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            return Err(SummarizerError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: CompletionResponse =
            serde_json::from_slice(&bytes).map_err(|source| SummarizerError::Deserialize {
                context: "chat completion response".to_owned(),
                source,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(SummarizerError::EmptyCompletion)
    }
}
