//! Job submission.

use serde::Serialize;

use crate::client::QueueClient;
use crate::codec;
use crate::error::{RelayError, Result};
use crate::execution::http::{HttpMethod, QueueOperation, execute_request};
use crate::types::JobHandle;

impl QueueClient {
    /// Create a job for `model` and return its handle.
    ///
    /// The handle is guaranteed to carry a status locator. Nothing is retried.
    pub async fn submit<I>(&self, model: &str, input: &I) -> Result<JobHandle>
    where
        I: Serialize + ?Sized,
    {
        let payload = self.protocol.wrap_input(model, codec::to_value(input)?);
        let body = codec::encode(&payload)?;
        let url = self.submit_url(model);

        tracing::debug!(provider = self.provider_id(), %url, "submitting job");
        let response = execute_request(
            &self.http,
            QueueOperation::Submit,
            HttpMethod::Post,
            &url,
            Some(body),
        )
        .await?;

        let handle = self.protocol.parse_handle(&response.body)?;
        if handle.status_locator.is_none() {
            tracing::warn!(
                provider = self.provider_id(),
                model,
                "create-job response carried no status locator"
            );
            return Err(RelayError::MissingStatusLocator);
        }

        tracing::debug!(
            provider = self.provider_id(),
            request_id = handle.request_id.as_deref().unwrap_or("-"),
            status = %handle.status,
            "job submitted"
        );
        Ok(handle)
    }
}
