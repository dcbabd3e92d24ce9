//! Retries driven by the `backoff` crate's exponential schedule.

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::future::Future;
use std::time::Duration;

use crate::error::{RelayError, Result};

#[derive(Debug, Clone)]
pub struct BackoffRetryExecutor {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    pub randomization_factor: f64,
    /// Wall-clock cap on the whole retry loop
    pub max_elapsed_time: Option<Duration>,
}

impl Default for BackoffRetryExecutor {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
            randomization_factor: 0.5,
            max_elapsed_time: Some(Duration::from_secs(120)),
        }
    }
}

impl BackoffRetryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    pub fn with_randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_elapsed_time(mut self, limit: Option<Duration>) -> Self {
        self.max_elapsed_time = limit;
        self
    }

    fn schedule(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_multiplier(self.multiplier)
            .with_randomization_factor(self.randomization_factor)
            .with_max_elapsed_time(self.max_elapsed_time)
            .build()
    }

    /// Retry while the error [`is_retryable`](RelayError::is_retryable) and
    /// both the attempt budget and the schedule allow it.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut schedule = self.schedule();
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(attempt, "operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                return Err(error);
            }
            if attempt >= max_attempts {
                tracing::warn!(attempt, max_attempts, error = %error, "retry budget exhausted");
                return Err(error);
            }

            match schedule.next_backoff() {
                Some(wait) => {
                    tracing::debug!(attempt, wait_ms = wait.as_millis() as u64, error = %error, "retrying after backoff");
                    tokio::time::sleep(wait).await;
                }
                None => {
                    tracing::warn!(attempt, error = %error, "retry window elapsed");
                    return Err(error);
                }
            }
        }
    }
}

/// Retry `operation` with the default backoff schedule.
pub async fn retry_with_backoff<F, Fut, T>(operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    BackoffRetryExecutor::default().execute(operation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> BackoffRetryExecutor {
        BackoffRetryExecutor::new()
            .with_initial_interval(Duration::from_millis(1))
            .with_max_interval(Duration::from_millis(5))
            .with_randomization_factor(0.0)
    }

    #[tokio::test]
    async fn transport_errors_are_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let out = fast()
            .with_max_attempts(4)
            .execute(|| {
                let calls = calls.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(RelayError::TransportError("connection reset".into()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(out, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_limit_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let err = fast()
            .execute(|| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(RelayError::RetryLimitReached { attempts: 30 })
                }
            })
            .await
            .unwrap_err();

        assert!(err.is_retry_limit());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
