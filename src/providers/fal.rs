//! Fal queue protocol.
//!
//! Fal runs inference asynchronously behind `queue.fal.run`:
//! `POST /{model}` returns `status_url`, `response_url` and `cancel_url`;
//! `GET status_url` reports `IN_QUEUE`, `IN_PROGRESS` or `COMPLETED`;
//! `GET response_url` returns the model output; `PUT cancel_url` aborts.

use reqwest::header::{AUTHORIZATION, HeaderMap};
use serde::Deserialize;

use crate::codec;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::QueueProtocol;
use crate::types::job::parse_locator;
use crate::types::{JobHandle, JobStatus};

pub const FAL_QUEUE_HOST: &str = "queue.fal.run";
pub const FAL_QUEUE_BASE_URL: &str = "https://queue.fal.run";

#[derive(Debug, Clone, Deserialize)]
struct FalQueueResponse {
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    status_url: Option<String>,
    #[serde(default)]
    response_url: Option<String>,
    #[serde(default)]
    cancel_url: Option<String>,
    #[serde(default)]
    queue_position: Option<u64>,
}

fn map_status(status: Option<&str>) -> JobStatus {
    match status {
        Some("IN_QUEUE") => JobStatus::Queued,
        Some("IN_PROGRESS") => JobStatus::InProgress,
        Some("COMPLETED") => JobStatus::Completed,
        _ => JobStatus::Unknown,
    }
}

/// Fal queue protocol (`queue.fal.run`).
#[derive(Debug, Clone, Copy, Default)]
pub struct FalQueue;

impl QueueProtocol for FalQueue {
    fn provider_id(&self) -> &'static str {
        "fal"
    }

    fn expected_host(&self) -> &str {
        FAL_QUEUE_HOST
    }

    fn default_base_url(&self) -> &str {
        FAL_QUEUE_BASE_URL
    }

    fn api_key_env(&self) -> &'static str {
        "FAL_KEY"
    }

    fn parse_handle(&self, body: &[u8]) -> Result<JobHandle> {
        let value = codec::decode_value(body)?;
        let response: FalQueueResponse = codec::from_value(value)?;

        Ok(JobHandle {
            status_locator: parse_locator("status_url", response.status_url.as_deref())?,
            result_locator: parse_locator("response_url", response.response_url.as_deref())?,
            cancel_locator: parse_locator("cancel_url", response.cancel_url.as_deref())?,
            request_id: response.request_id,
            queue_position: response.queue_position,
            error: None,
            status: map_status(response.status.as_deref()),
            raw_status: response.status,
        })
    }

    fn build_headers(&self, config: &ClientConfig) -> Result<HeaderMap> {
        let mut headers = config.common_headers()?;
        headers.insert(AUTHORIZATION, config.auth_header("Key")?);
        Ok(headers)
    }
}
