//! Caller-side retry helpers
//! - policy.rs: exponential schedule with `rand` jitter
//! - backoff.rs: `backoff` crate schedule

pub mod backoff;
pub mod policy;

pub use backoff::{BackoffRetryExecutor, retry_with_backoff};
pub use policy::{RetryExecutor, RetryPolicy, retry_with_default};
