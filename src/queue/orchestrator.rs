//! Submit, poll and fetch in one call.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::QueueClient;
use crate::error::{RelayError, Result};
use crate::types::PollPolicy;
use crate::utils::cancel::{CancelHandle, until_cancelled};

impl QueueClient {
    /// Run a job end to end and return its typed output.
    ///
    /// ```rust,no_run
    /// use relaykit::prelude::*;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Images {
    ///     images: Vec<serde_json::Value>,
    /// }
    ///
    /// # async fn run() -> Result<(), RelayError> {
    /// let client = QueueClient::builder().fal().build()?;
    /// let out: Images = client
    ///     .run_job(
    ///         "fal-ai/fast-sdxl",
    ///         &serde_json::json!({ "prompt": "a lighthouse at dusk" }),
    ///         &PollPolicy::default(),
    ///     )
    ///     .await?;
    /// println!("{} images", out.images.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_job<I, T>(&self, model: &str, input: &I, policy: &PollPolicy) -> Result<T>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.run_job_inner(model, input, policy, None).await
    }

    /// Cancellable variant of [`run_job`](Self::run_job).
    ///
    /// Cancellation stops local work only; the provider job keeps running
    /// unless [`cancel`](Self::cancel) is called with its handle.
    pub async fn run_job_with_cancel<I, T>(
        &self,
        model: &str,
        input: &I,
        policy: &PollPolicy,
        cancel: &CancelHandle,
    ) -> Result<T>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.run_job_inner(model, input, policy, Some(cancel)).await
    }

    /// Run several independent jobs concurrently.
    ///
    /// Outputs come back in input order. The first error aborts the remaining
    /// sessions.
    pub async fn run_jobs<I, T>(&self, model: &str, inputs: &[I], policy: &PollPolicy) -> Result<Vec<T>>
    where
        I: Serialize,
        T: DeserializeOwned,
    {
        let runs = inputs
            .iter()
            .map(|input| self.run_job_inner(model, input, policy, None));
        futures::future::try_join_all(runs).await
    }

    async fn run_job_inner<I, T>(
        &self,
        model: &str,
        input: &I,
        policy: &PollPolicy,
        cancel: Option<&CancelHandle>,
    ) -> Result<T>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let submitted = until_cancelled(cancel, self.submit(model, input)).await?;
        let status_locator = submitted
            .status_locator
            .ok_or(RelayError::MissingStatusLocator)?;

        let completed = self.poll_session(&status_locator, policy, cancel).await?;
        let result_locator = completed
            .result_locator
            .ok_or(RelayError::MissingResultLocator)?;

        until_cancelled(cancel, self.fetch_result(&result_locator)).await
    }
}
