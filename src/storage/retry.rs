//! Bounded exponential backoff for transient store failures.

use super::types::StoreError;

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; `1` disables retries.
    pub attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Upper bound of the random delay added to every backoff step.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_delay: Duration::from_millis(150),
            max_delay: Duration::from_millis(1200),
            jitter: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            attempts: 1,
            ..Self::default()
        }
    }

    fn backoff(&self, delay: Duration) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return delay;
        }
        delay + Duration::from_millis(rand::random::<u64>() % jitter_ms)
    }
}

/// Runs `call` until it succeeds, fails with a non-transient error, or the attempts run out.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let attempts = policy.attempts.max(1);
    let mut delay = policy.initial_delay;

    for attempt in 1..=attempts {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < attempts => {
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}",
                    operation,
                    attempt,
                    attempts,
                    e
                );
                tokio::time::sleep(policy.backoff(delay)).await;
                delay = (delay * 2).min(policy.max_delay);
            }
            Err(e) => return Err(e),
        }
    }

    Err(StoreError::Transport(format!(
        "{}: retry attempts exhausted",
        operation
    )))
}
