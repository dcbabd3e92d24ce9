//! Provider queue protocols.
//!
//! A [`QueueProtocol`] describes how one provider lays out its
//! "create job → poll status → fetch result" API: which host its locators
//! live on, how the create and status bodies map onto a [`JobHandle`], where
//! the output sits in the result body, and which headers authenticate a call.
//! The queue client itself is provider-agnostic and only talks to this trait.

use reqwest::header::HeaderMap;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::execution::http::HttpMethod;
use crate::types::JobHandle;

pub trait QueueProtocol: Send + Sync {
    /// Short provider identifier used in logs and interceptor contexts.
    fn provider_id(&self) -> &'static str;

    /// Host every status, result and cancel locator must point at.
    fn expected_host(&self) -> &str;

    /// Base URL used when none is configured.
    fn default_base_url(&self) -> &str;

    /// Provider-specific environment variable holding the API key.
    fn api_key_env(&self) -> &'static str;

    /// Path the create-job request is posted to.
    ///
    /// The default prefixes a `/` when the model identifier lacks one.
    fn submit_path(&self, model: &str) -> String {
        normalize_model_path(model)
    }

    /// Shape the encoded input into the create-job body for `model`.
    fn wrap_input(&self, _model: &str, input: serde_json::Value) -> serde_json::Value {
        input
    }

    /// Decode a create-job or status response body.
    fn parse_handle(&self, body: &[u8]) -> Result<JobHandle>;

    /// Pick the job output out of a decoded result body.
    fn extract_output(&self, body: serde_json::Value) -> Result<serde_json::Value> {
        Ok(body)
    }

    /// Method used against the cancel locator.
    fn cancel_method(&self) -> HttpMethod {
        HttpMethod::Put
    }

    /// Headers attached to every request (authentication included).
    fn build_headers(&self, config: &ClientConfig) -> Result<HeaderMap>;
}

/// Ensure a model identifier starts with a path separator.
pub fn normalize_model_path(model: &str) -> String {
    let trimmed = model.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
