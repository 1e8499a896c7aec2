//! Bounded retry with exponential backoff for transient transport errors.
//!
//! An explicit loop with an attempt counter — never recursion — so the call
//! stack stays flat however high the retry budget is configured. The
//! original deployment retried up to 15 times on TLS-level failures.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` is a transient condition worth retrying.
///
/// Retriable: network/TLS failures ([`ScraperError::Http`]), HTTP 429
/// ([`ScraperError::RateLimited`]), and 5xx ([`ScraperError::ServerError`]).
/// Everything else (404, other 4xx, malformed JSON) would fail identically
/// on a retry and is propagated immediately.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::Http(_) | ScraperError::RateLimited { .. } | ScraperError::ServerError { .. }
    )
}

/// Executes `operation`, retrying transient failures with exponential
/// backoff (`backoff_base_secs * 2^attempt` seconds) up to `max_retries`
/// additional attempts after the first. A 429's `Retry-After` takes over
/// whenever it exceeds the computed backoff.
///
/// When the budget is exhausted the final error is wrapped in
/// [`ScraperError::RetryExhausted`] carrying the total attempt count, so the
/// fatal surface names both the retry count and the cause. Non-retriable
/// errors come back unwrapped.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
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

        if !is_retriable(&err) {
            return Err(err);
        }
        if attempt >= max_retries {
            return Err(ScraperError::RetryExhausted {
                attempts: attempt + 1,
                source: Box::new(err),
            });
        }

        // Cap the shift so extreme retry budgets cannot overflow.
        let mut delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        if let ScraperError::RateLimited { retry_after_secs } = err {
            delay_secs = delay_secs.max(retry_after_secs);
        }
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
