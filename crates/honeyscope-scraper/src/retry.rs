//! Retry with exponential backoff for storefront and widget requests.
//!
//! Only transport-level failures are retried. An HTTP error status means the
//! server answered, so it is returned to the caller on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` is a transport failure worth another attempt.
///
/// Retriable:
/// - connection refused or reset while connecting
/// - request or connect timeout
/// - the connection dropped while sending the request or reading the body
///
/// Everything else, including [`ScraperError::UnexpectedStatus`], is final.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request() || e.is_body(),
        _ => false,
    }
}

/// Executes `operation`, retrying transport failures up to `max_retries` times.
///
/// The wait before retry `n` (1-based) is `backoff_base_ms * 2^(n-1)`
/// milliseconds. With `max_retries = 5` the operation runs at most 6 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_ms = backoff_base_ms.saturating_mul(1u64 << attempt.min(20));
        attempt += 1;
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            error = %err,
            "transport error, retrying request"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
