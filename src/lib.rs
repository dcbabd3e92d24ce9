//! relaykit
//!
//! Client for AI inference providers that run jobs asynchronously behind a
//! queue: submit a job, poll its status URL until it completes, then fetch the
//! typed result. Fal (`queue.fal.run`) and Replicate (`api.replicate.com`) are
//! built in; other providers plug in through [`QueueProtocol`].
//!
//! ```rust,no_run
//! use relaykit::prelude::*;
//!
//! # async fn run() -> Result<(), RelayError> {
//! let client = QueueClient::builder()
//!     .fal()
//!     .api_key("proxy-key")
//!     .base_url("https://proxy.example.com")
//!     .build()?;
//!
//! let handle = client
//!     .submit("fal-ai/fast-sdxl", &serde_json::json!({ "prompt": "a tide pool" }))
//!     .await?;
//! let Some(status_url) = handle.status_locator.as_ref() else {
//!     return Err(RelayError::MissingStatusLocator);
//! };
//! let done = client.poll_until_complete(status_url, &PollPolicy::default()).await?;
//! let Some(result_url) = done.result_locator.as_ref() else {
//!     return Err(RelayError::MissingResultLocator);
//! };
//! let output: serde_json::Value = client.fetch_result(result_url).await?;
//! # let _ = output;
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod builder;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod protocol;
pub mod providers;
pub mod queue;
pub mod retry;
pub mod retry_api;
pub mod types;
pub mod utils;

pub use builder::QueueClientBuilder;
pub use client::QueueClient;
pub use config::ClientConfig;
pub use error::{ErrorEnvelope, RelayError};
pub use protocol::QueueProtocol;
pub use types::{HttpConfig, JobHandle, JobStatus, PollPolicy};
pub use utils::cancel::CancelHandle;

#[cfg(feature = "fal")]
pub use providers::FalQueue;
#[cfg(feature = "replicate")]
pub use providers::ReplicatePredictions;

/// Commonly used types.
pub mod prelude {
    pub use crate::builder::QueueClientBuilder;
    pub use crate::client::QueueClient;
    pub use crate::config::ClientConfig;
    pub use crate::error::{ErrorEnvelope, RelayError};
    pub use crate::protocol::QueueProtocol;
    pub use crate::types::{JobHandle, JobStatus, PollPolicy};
    pub use crate::utils::cancel::{CancelHandle, new_cancel_handle};

    #[cfg(feature = "fal")]
    pub use crate::providers::FalQueue;
    #[cfg(feature = "replicate")]
    pub use crate::providers::ReplicatePredictions;
}
