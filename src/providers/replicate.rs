//! Replicate predictions protocol.
//!
//! `POST /v1/models/{owner}/{name}/predictions` with `{"input": ...}` creates a
//! prediction whose `urls.get` is polled until `status` is `succeeded`; the
//! same resource then carries the `output`. `failed` and `canceled` are
//! terminal. `POST urls.cancel` aborts a running prediction.
//!
//! A model written as `owner/name:version` is pinned: it is posted to
//! `/v1/predictions` as `{"version": ..., "input": ...}`.

use reqwest::header::{AUTHORIZATION, HeaderMap};
use serde::Deserialize;

use crate::codec;
use crate::config::ClientConfig;
use crate::error::{RelayError, Result};
use crate::execution::http::HttpMethod;
use crate::protocol::{QueueProtocol, normalize_model_path};
use crate::types::job::parse_locator;
use crate::types::{JobHandle, JobStatus};

pub const REPLICATE_API_HOST: &str = "api.replicate.com";
pub const REPLICATE_BASE_URL: &str = "https://api.replicate.com";

#[derive(Debug, Clone, Default, Deserialize)]
struct PredictionUrls {
    #[serde(default)]
    get: Option<String>,
    #[serde(default)]
    cancel: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Prediction {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

fn map_status(status: Option<&str>) -> JobStatus {
    match status {
        Some("starting") => JobStatus::Queued,
        Some("processing") => JobStatus::InProgress,
        Some("succeeded") => JobStatus::Completed,
        Some("failed") | Some("canceled") => JobStatus::Failed,
        _ => JobStatus::Unknown,
    }
}

/// Split `owner/name:version` into the model and its pinned version.
fn pinned_version(model: &str) -> Option<&str> {
    model
        .trim()
        .rsplit_once(':')
        .map(|(_, version)| version.trim())
        .filter(|version| !version.is_empty())
}

fn error_text(error: Option<serde_json::Value>) -> Option<String> {
    match error? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Replicate predictions protocol (`api.replicate.com`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplicatePredictions;

impl QueueProtocol for ReplicatePredictions {
    fn provider_id(&self) -> &'static str {
        "replicate"
    }

    fn expected_host(&self) -> &str {
        REPLICATE_API_HOST
    }

    fn default_base_url(&self) -> &str {
        REPLICATE_BASE_URL
    }

    fn api_key_env(&self) -> &'static str {
        "REPLICATE_API_TOKEN"
    }

    /// `owner/name` becomes the official-model predictions endpoint;
    /// `owner/name:version` goes to the version-pinned `/v1/predictions`.
    fn submit_path(&self, model: &str) -> String {
        if pinned_version(model).is_some() {
            "/v1/predictions".to_string()
        } else {
            format!("/v1/models{}/predictions", normalize_model_path(model))
        }
    }

    fn wrap_input(&self, model: &str, input: serde_json::Value) -> serde_json::Value {
        match pinned_version(model) {
            Some(version) => serde_json::json!({ "version": version, "input": input }),
            None => serde_json::json!({ "input": input }),
        }
    }

    fn parse_handle(&self, body: &[u8]) -> Result<JobHandle> {
        let value = codec::decode_value(body)?;
        let prediction: Prediction = codec::from_value(value)?;
        let urls = prediction.urls.unwrap_or_default();
        let status = map_status(prediction.status.as_deref());

        let get = parse_locator("urls.get", urls.get.as_deref())?;
        let result_locator = if status == JobStatus::Completed {
            get.clone()
        } else {
            None
        };

        Ok(JobHandle {
            status_locator: get,
            result_locator,
            cancel_locator: parse_locator("urls.cancel", urls.cancel.as_deref())?,
            request_id: prediction.id,
            queue_position: None,
            error: error_text(prediction.error),
            status,
            raw_status: prediction.status,
        })
    }

    fn extract_output(&self, mut body: serde_json::Value) -> Result<serde_json::Value> {
        match body.get_mut("output").map(serde_json::Value::take) {
            Some(serde_json::Value::Null) | None => Err(RelayError::DecodeError(
                "prediction response has no output".to_string(),
            )),
            Some(output) => Ok(output),
        }
    }

    fn cancel_method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn build_headers(&self, config: &ClientConfig) -> Result<HeaderMap> {
        let mut headers = config.common_headers()?;
        headers.insert(AUTHORIZATION, config.auth_header("Bearer")?);
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(status: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "id": "gm3qorzdhgbfurvjtvhg6dckhu",
            "model": "black-forest-labs/flux-schnell",
            "status": status,
            "error": null,
            "urls": {
                "get": "https://api.replicate.com/v1/predictions/gm3qorzdhgbfurvjtvhg6dckhu",
                "cancel": "https://api.replicate.com/v1/predictions/gm3qorzdhgbfurvjtvhg6dckhu/cancel"
            }
        }))
        .unwrap()
    }

    #[test]
    fn submit_path_targets_official_model_endpoint() {
        let p = ReplicatePredictions;
        assert_eq!(
            p.submit_path("black-forest-labs/flux-schnell"),
            "/v1/models/black-forest-labs/flux-schnell/predictions"
        );
        assert_eq!(p.submit_path("stability-ai/sdxl:7762fd07"), "/v1/predictions");
    }

    #[test]
    fn input_is_wrapped() {
        let wrapped = ReplicatePredictions
            .wrap_input("black-forest-labs/flux-schnell", serde_json::json!({"prompt": "a fox"}));
        assert_eq!(wrapped, serde_json::json!({"input": {"prompt": "a fox"}}));
    }

    #[test]
    fn pinned_version_is_a_top_level_field() {
        let wrapped = ReplicatePredictions
            .wrap_input("stability-ai/sdxl:7762fd07", serde_json::json!({"prompt": "a fox"}));
        assert_eq!(
            wrapped,
            serde_json::json!({"version": "7762fd07", "input": {"prompt": "a fox"}})
        );
        assert_eq!(pinned_version("stability-ai/sdxl:"), None);
        assert_eq!(pinned_version("stability-ai/sdxl"), None);
    }

    #[test]
    fn result_locator_only_when_succeeded() {
        let p = ReplicatePredictions;
        let starting = p.parse_handle(&prediction("starting")).unwrap();
        assert_eq!(starting.status, JobStatus::Queued);
        assert!(starting.status_locator.is_some());
        assert!(starting.result_locator.is_none());

        let done = p.parse_handle(&prediction("succeeded")).unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.result_locator, done.status_locator);
    }

    #[test]
    fn failed_and_canceled_are_terminal_failures() {
        let p = ReplicatePredictions;
        assert_eq!(p.parse_handle(&prediction("failed")).unwrap().status, JobStatus::Failed);
        assert_eq!(p.parse_handle(&prediction("canceled")).unwrap().status, JobStatus::Failed);
        assert_eq!(
            p.parse_handle(&prediction("booting")).unwrap().status,
            JobStatus::Unknown
        );
    }

    #[test]
    fn error_field_is_captured() {
        let body = serde_json::json!({
            "id": "x",
            "status": "failed",
            "error": "NSFW content detected",
            "urls": { "get": "https://api.replicate.com/v1/predictions/x" }
        });
        let handle = ReplicatePredictions
            .parse_handle(&serde_json::to_vec(&body).unwrap())
            .unwrap();
        assert_eq!(handle.error.as_deref(), Some("NSFW content detected"));
    }

    #[test]
    fn output_is_extracted_from_prediction() {
        let out = ReplicatePredictions
            .extract_output(serde_json::json!({"status": "succeeded", "output": ["https://replicate.delivery/a.webp"]}))
            .unwrap();
        assert_eq!(out, serde_json::json!(["https://replicate.delivery/a.webp"]));

        let missing = ReplicatePredictions.extract_output(serde_json::json!({"output": null}));
        assert!(matches!(missing, Err(RelayError::DecodeError(_))));
    }

    #[test]
    fn auth_header_uses_bearer_scheme() {
        let config = ClientConfig::new(REPLICATE_BASE_URL, "r8_token");
        let headers = ReplicatePredictions.build_headers(&config).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer r8_token");
    }
}
