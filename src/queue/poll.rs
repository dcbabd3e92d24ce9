//! Status polling.
//!
//! A poll session sleeps one interval before every status check, so `N`
//! checks always cost `N` sleeps and a session never waits longer than
//! `max_attempts * interval`.

use reqwest::Url;

use crate::client::QueueClient;
use crate::error::{RelayError, Result};
use crate::execution::http::{HttpMethod, QueueOperation, execute_request};
use crate::types::{JobHandle, JobStatus, PollPolicy};
use crate::utils::cancel::{CancelHandle, until_cancelled};

impl QueueClient {
    /// Perform a single status check, without sleeping.
    pub async fn check_status(&self, status_locator: &Url) -> Result<JobHandle> {
        let url = self.route_locator(status_locator)?;
        self.fetch_status(status_locator, &url).await
    }

    /// Poll `status_locator` until the job completes.
    ///
    /// The returned handle's status is always [`JobStatus::Completed`].
    pub async fn poll_until_complete(
        &self,
        status_locator: &Url,
        policy: &PollPolicy,
    ) -> Result<JobHandle> {
        self.poll_session(status_locator, policy, None).await
    }

    /// Like [`poll_until_complete`](Self::poll_until_complete), returning
    /// [`RelayError::Cancelled`] as soon as `cancel` fires.
    pub async fn poll_until_complete_with_cancel(
        &self,
        status_locator: &Url,
        policy: &PollPolicy,
        cancel: &CancelHandle,
    ) -> Result<JobHandle> {
        self.poll_session(status_locator, policy, Some(cancel)).await
    }

    pub(crate) async fn poll_session(
        &self,
        status_locator: &Url,
        policy: &PollPolicy,
        cancel: Option<&CancelHandle>,
    ) -> Result<JobHandle> {
        let url = self.route_locator(status_locator)?;
        let max_attempts = policy.max_attempts();

        for attempt in 1..=max_attempts {
            until_cancelled(cancel, async {
                tokio::time::sleep(policy.interval()).await;
                Ok(())
            })
            .await?;

            let handle = until_cancelled(cancel, self.fetch_status(status_locator, &url)).await?;
            match handle.status {
                JobStatus::Completed => {
                    tracing::debug!(provider = self.provider_id(), attempt, "job completed");
                    return Ok(handle);
                }
                JobStatus::Failed => {
                    tracing::warn!(
                        provider = self.provider_id(),
                        attempt,
                        status = handle.raw_status.as_deref().unwrap_or("failed"),
                        "job failed"
                    );
                    return Err(RelayError::JobFailed {
                        status: handle.raw_status.unwrap_or_else(|| "failed".to_string()),
                        detail: handle.error,
                    });
                }
                status => {
                    tracing::debug!(
                        provider = self.provider_id(),
                        attempt,
                        max_attempts,
                        %status,
                        queue_position = ?handle.queue_position,
                        "job still pending"
                    );
                }
            }
        }

        tracing::warn!(
            provider = self.provider_id(),
            %status_locator,
            attempts = max_attempts,
            "poll budget exhausted"
        );
        Err(RelayError::RetryLimitReached {
            attempts: max_attempts,
        })
    }

    async fn fetch_status(&self, status_locator: &Url, url: &str) -> Result<JobHandle> {
        let response =
            execute_request(&self.http, QueueOperation::Status, HttpMethod::Get, url, None).await?;
        let mut handle = self.protocol.parse_handle(&response.body)?;
        if handle.status_locator.is_none() {
            handle.status_locator = Some(status_locator.clone());
        }
        Ok(handle)
    }
}
