//! Public Retry API Facade
//!
//! - Simple default: `retry` uses the backoff-based executor
//! - Opt-in control: `RetryOptions` selects the backend and its settings
//!
//! Example
//! ```rust,no_run
//! use relaykit::prelude::*;
//! use relaykit::retry_api::{retry, retry_with, RetryOptions};
//!
//! # async fn example(client: QueueClient) -> Result<(), RelayError> {
//! let input = serde_json::json!({ "prompt": "a red kite" });
//!
//! // Resubmit on transport failures, 429 and 5xx
//! let handle = retry(|| client.submit("fal-ai/fast-sdxl", &input)).await?;
//!
//! // Policy-based backend with a larger budget
//! let options = RetryOptions::policy_default().with_max_attempts(5);
//! let poll = PollPolicy::default();
//! let out: serde_json::Value = retry_with(
//!     || client.run_job("fal-ai/fast-sdxl", &input, &poll),
//!     options,
//! )
//! .await?;
//! # let _ = (handle, out);
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use crate::error::Result;

pub use crate::retry::{BackoffRetryExecutor, RetryExecutor, RetryPolicy};

/// Retry backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryBackend {
    /// `backoff` crate executor (recommended default)
    #[default]
    Backoff,
    /// Exponential policy executor with `rand` jitter
    Policy,
}

/// Unified retry options
#[derive(Debug, Clone, Default)]
pub struct RetryOptions {
    pub backend: RetryBackend,
    pub backoff: Option<BackoffRetryExecutor>,
    pub policy: Option<RetryPolicy>,
}

impl RetryOptions {
    /// Use the default backoff backend
    pub fn backoff() -> Self {
        Self::default()
    }

    /// Use the backoff backend with explicit settings
    pub fn with_backoff(executor: BackoffRetryExecutor) -> Self {
        Self {
            backend: RetryBackend::Backoff,
            backoff: Some(executor),
            policy: None,
        }
    }

    /// Use the policy backend with the default policy
    pub fn policy_default() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            backend: RetryBackend::Policy,
            backoff: None,
            policy: Some(policy),
        }
    }

    /// Set max attempts on whichever backend is selected
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        match self.backend {
            RetryBackend::Backoff => {
                let executor = self.backoff.take().unwrap_or_default();
                self.backoff = Some(executor.with_max_attempts(attempts));
            }
            RetryBackend::Policy => {
                let policy = self.policy.take().unwrap_or_default();
                self.policy = Some(policy.with_max_attempts(attempts));
            }
        }
        self
    }
}

/// Recommended default retry (backoff-based)
pub async fn retry<F, Fut, T>(operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    crate::retry::retry_with_backoff(operation).await
}

/// Retry with explicit options (backend selection)
pub async fn retry_with<F, Fut, T>(operation: F, options: RetryOptions) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match options.backend {
        RetryBackend::Backoff => options.backoff.unwrap_or_default().execute(operation).await,
        RetryBackend::Policy => {
            RetryExecutor::new(options.policy.unwrap_or_default())
                .execute(operation)
                .await
        }
    }
}

/// Retry only when `options` is given; otherwise run `operation` once.
pub async fn maybe_retry<F, Fut, T>(options: Option<RetryOptions>, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match options {
        Some(options) => retry_with(operation, options).await,
        None => operation().await,
    }
}
