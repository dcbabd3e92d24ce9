//! Request execution pipeline.
//!
//! 1. Merge base headers (auth + configured extras) with per-request headers
//! 2. Apply HTTP interceptors
//! 3. Send through the configured transport
//! 4. Classify any status above 299 as `UnsuccessfulRequest`

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::error::{ErrorEnvelope, RelayError};
use crate::execution::http::interceptor::{HttpInterceptor, HttpRequestContext, QueueOperation};
use crate::execution::http::transport::{
    HttpMethod, HttpTransport, HttpTransportRequest, HttpTransportResponse,
};

/// Configuration for HTTP request execution
#[derive(Clone)]
pub struct HttpExecutionConfig {
    /// Provider ID for logging
    pub provider_id: String,
    /// Transport every request is sent through
    pub transport: Arc<dyn HttpTransport>,
    /// Headers attached to every request (auth + configured extras)
    pub base_headers: HeaderMap,
    /// HTTP interceptors (order preserved)
    pub interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl std::fmt::Debug for HttpExecutionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExecutionConfig")
            .field("provider_id", &self.provider_id)
            .field("base_headers", &self.base_headers.keys().collect::<Vec<_>>())
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

/// Send one request and classify the outcome.
///
/// Returns the raw response when its status is at most 299. Nothing is retried.
pub async fn execute_request(
    config: &HttpExecutionConfig,
    operation: QueueOperation,
    method: HttpMethod,
    url: &str,
    body: Option<Vec<u8>>,
) -> Result<HttpTransportResponse, RelayError> {
    let ctx = HttpRequestContext {
        provider_id: config.provider_id.clone(),
        operation,
        url: url.to_string(),
    };

    let mut headers = config.base_headers.clone();
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    let mut request = HttpTransportRequest {
        ctx: ctx.clone(),
        method,
        url: url.to_string(),
        headers,
        body,
    };

    for interceptor in &config.interceptors {
        if let Err(e) = interceptor.on_before_send(&ctx, &mut request) {
            notify_error(config, &ctx, &e);
            return Err(e);
        }
    }

    let response = match config.transport.execute(request).await {
        Ok(response) => response,
        Err(e) => {
            notify_error(config, &ctx, &e);
            return Err(e);
        }
    };

    for interceptor in &config.interceptors {
        if let Err(e) = interceptor.on_response(&ctx, &response) {
            notify_error(config, &ctx, &e);
            return Err(e);
        }
    }

    if !response.is_success() {
        let error =
            RelayError::UnsuccessfulRequest(ErrorEnvelope::from_bytes(response.status, &response.body));
        notify_error(config, &ctx, &error);
        return Err(error);
    }

    Ok(response)
}

fn notify_error(config: &HttpExecutionConfig, ctx: &HttpRequestContext, error: &RelayError) {
    for interceptor in &config.interceptors {
        interceptor.on_error(ctx, error);
    }
}
