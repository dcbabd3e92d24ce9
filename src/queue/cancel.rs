//! Provider-side job cancellation.

use crate::client::QueueClient;
use crate::error::{RelayError, Result};
use crate::execution::http::{QueueOperation, execute_request};
use crate::types::JobHandle;

impl QueueClient {
    /// Ask the provider to abort a queued or running job.
    ///
    /// Fal expects `PUT cancel_url`, Replicate `POST urls.cancel`. A job that
    /// already finished may be rejected by the provider with a status above 299.
    pub async fn cancel(&self, handle: &JobHandle) -> Result<()> {
        let locator = handle
            .cancel_locator
            .as_ref()
            .ok_or(RelayError::MissingCancelLocator)?;
        let url = self.route_locator(locator)?;
        let method = self.protocol.cancel_method();

        tracing::debug!(provider = self.provider_id(), %method, %url, "cancelling job");
        execute_request(&self.http, QueueOperation::Cancel, method, &url, None).await?;
        Ok(())
    }
}
