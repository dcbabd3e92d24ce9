//! Result retrieval.

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::client::QueueClient;
use crate::codec;
use crate::error::Result;
use crate::execution::http::{HttpMethod, QueueOperation, execute_request};

impl QueueClient {
    /// Retrieve and decode the output of a completed job.
    pub async fn fetch_result<T: DeserializeOwned>(&self, result_locator: &Url) -> Result<T> {
        let url = self.route_locator(result_locator)?;

        tracing::debug!(provider = self.provider_id(), %url, "fetching job result");
        let response =
            execute_request(&self.http, QueueOperation::Fetch, HttpMethod::Get, &url, None).await?;

        let body = codec::decode_value(&response.body)?;
        let output = self.protocol.extract_output(body)?;
        codec::from_value(output)
    }
}
