//! Exponential backoff retry logic for generation calls.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::warn;

/// Default configuration: 3 total attempts, base 1s, doubling, max 30s.
pub const MAX_ATTEMPTS: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

/// Bounded retry schedule. The wait before retry `n` (0-based) is
/// `base_interval * 2^n`, capped at `max_interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_interval: Duration,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
            max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.base_interval,
            initial_interval: self.base_interval,
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_interval: self.max_interval,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Retry an async operation with exponential backoff.
///
/// `attempt` is called up to `policy.max_attempts` times. Errors for which
/// `should_retry` returns false are returned immediately without waiting.
/// Retryable errors sleep the current task for the next backoff interval;
/// no lock is held while waiting, and dropping the returned future stops the
/// loop.
///
/// `wrap_exhausted` converts the last retryable error, together with the
/// number of attempts made, into the caller's exhausted-retries error.
pub async fn retry_with_backoff<T, E, Fut, F, R, W>(
    policy: &RetryPolicy,
    mut attempt: F,
    should_retry: R,
    wrap_exhausted: W,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    W: FnOnce(E, u32) -> E,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = policy.backoff();
    let mut attempts = 0;

    loop {
        attempts += 1;

        let error = match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !should_retry(&error) {
            return Err(error);
        }

        if attempts >= max_attempts {
            return Err(wrap_exhausted(error, attempts));
        }

        let wait_duration = backoff.next_backoff().unwrap_or(policy.max_interval);
        warn!(
            "Attempt {}/{} failed: {}. Retrying in {:?}...",
            attempts, max_attempts, error, wait_duration
        );
        tokio::time::sleep(wait_duration).await;
    }
}
