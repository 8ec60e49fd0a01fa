//! Retry with randomized exponential back-off for provider calls.
//!
//! The policy is an explicit value rather than an annotation so the attempt
//! bound and back-off shape are visible at the call site and in tests.

use std::future::Future;
use std::time::Duration;

use crate::error::SentimentError;

/// Back-off parameters for [`retry_with_backoff`].
///
/// The delay before attempt `n + 1` is drawn uniformly from
/// `[min_delay, min(max_delay, min_delay * 2^n))`, so the first wait starts
/// at `min_delay` and the envelope doubles until it saturates at `max_delay`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first call.
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    /// 6 total attempts, delays in [1 s, 20 s). Matches the provider
    /// fetch policy used for both exemplar and input-text embeddings.
    fn default() -> Self {
        Self {
            max_attempts: 6,
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(20),
        }
    }
}

impl RetryPolicy {
    /// Policy with zero delays, for tests that only count attempts.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }
}

/// Runs `operation` until it succeeds or `policy.max_attempts` is exhausted.
///
/// Every failure from the operation is retried; the final error is returned
/// unchanged. Callers that need a non-retried failure path (e.g. an
/// empty-but-successful response) must check for it after this returns.
///
/// # Errors
///
/// Returns the last error produced by `operation` once attempts run out.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, SentimentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SentimentError>>,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= policy.max_attempts {
                    return Err(err);
                }
                let delay_ms = backoff_delay_ms(policy, attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms,
                    error = %err,
                    "embedding provider call failed — retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
        }
    }
}

/// Delay in milliseconds before the attempt following `attempt` failures.
fn backoff_delay_ms(policy: RetryPolicy, attempt: u32) -> u64 {
    #[allow(clippy::cast_possible_truncation)]
    let min_ms = policy.min_delay.as_millis() as u64;
    #[allow(clippy::cast_possible_truncation)]
    let max_ms = policy.max_delay.as_millis() as u64;

    let envelope = min_ms
        .saturating_mul(1u64 << attempt.min(10))
        .min(max_ms)
        .max(min_ms);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let jitter = (rand::random::<f64>() * (envelope - min_ms) as f64) as u64;
    min_ms + jitter
}
