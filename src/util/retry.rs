//! Retry with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use crate::error::BotError;

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Execute an async operation, retrying errors that are retryable.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, BotError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BotError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = self.initial_backoff;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };
            if !err.is_retryable() || attempt >= max_attempts {
                return Err(err);
            }

            tracing::warn!(attempt, max_attempts, error = %err, "retrying after error");

            let wait = match err {
                BotError::RateLimited {
                    retry_after_ms: Some(ms),
                } => Duration::from_millis(ms).min(self.max_backoff),
                // Jitter: 75%-125% of backoff
                _ => backoff.mul_f64(0.75 + rand_factor() * 0.5),
            };
            tokio::time::sleep(wait).await;

            backoff = backoff.mul_f64(self.multiplier).min(self.max_backoff);
        }
    }
}

/// Pseudo-random factor in [0, 1) from the clock and current thread id.
fn rand_factor() -> f64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    // Mixed in so concurrent threads draw different factors.
    std::thread::current().id().hash(&mut hasher);
    (hasher.finish() % 10_000) as f64 / 10_000.0
}
