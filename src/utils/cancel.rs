//! Cancellation utilities
//!
//! A [`CancelHandle`] aborts a poll session or a whole job run from another
//! task. Cancelling does not notify the provider; use
//! [`QueueClient::cancel`](crate::client::QueueClient::cancel) for that.

use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::{RelayError, Result};

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Sessions observing this handle stop at their next
    /// await point (a sleep or an in-flight request).
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Create a standalone cancel handle that can be shared across tasks.
pub fn new_cancel_handle() -> CancelHandle {
    CancelHandle::new()
}

/// Drive `future` unless `cancel` fires first.
pub(crate) async fn until_cancelled<F, T>(cancel: Option<&CancelHandle>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match cancel {
        None => future.await,
        Some(handle) => {
            tokio::select! {
                biased;
                _ = handle.cancelled() => Err(RelayError::Cancelled),
                out = future => out,
            }
        }
    }
}
