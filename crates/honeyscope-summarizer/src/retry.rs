//! Bounded back-off for rate-limited completion requests.
//!
//! Only [`SummarizerError::RateLimited`] is retried. Every other failure,
//! including transport errors and non-429 statuses, is returned at once so a
//! broken key or endpoint does not burn the whole retry budget.

use std::future::Future;
use std::time::Duration;

use crate::error::SummarizerError;

/// Longest single wait between attempts.
const MAX_DELAY_SECS: u64 = 320;

pub(crate) fn is_retriable(err: &SummarizerError) -> bool {
    matches!(err, SummarizerError::RateLimited { .. })
}

/// Seconds to wait before retry number `attempt` (1-based), before jitter.
///
/// A `Retry-After` hint from the provider wins over the exponential
/// schedule when it is longer. Both are capped at [`MAX_DELAY_SECS`].
fn base_delay_secs(backoff_base_secs: u64, attempt: u32, retry_after: Option<u64>) -> u64 {
    let computed = backoff_base_secs.saturating_mul(1u64 << (attempt - 1).min(10));
    computed.max(retry_after.unwrap_or(0)).min(MAX_DELAY_SECS)
}

/// Runs `operation`, retrying up to `max_retries` extra times on rate limits.
///
/// Waits `backoff_base_secs × 2^(attempt-1)` seconds ±25 % jitter between
/// attempts. When the budget is spent the last `RateLimited` error is
/// returned to the caller.
pub(crate) async fn retry_rate_limited<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SummarizerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SummarizerError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let retry_after = match &err {
                    SummarizerError::RateLimited { retry_after_secs } => *retry_after_secs,
                    _ => None,
                };
                let base = base_delay_secs(backoff_base_secs, attempt, retry_after);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (base as f64 * 1_000.0 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    "rate limit reached, sleeping before retrying completion"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
