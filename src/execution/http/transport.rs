//! HTTP transport abstraction.
//!
//! Every request the queue client makes goes through an injectable
//! [`HttpTransport`]. The default [`ReqwestTransport`] wraps a
//! `reqwest::Client`; tests and embedders can supply their own implementation
//! to observe the final URL/headers/body and return synthetic responses.

use crate::error::RelayError;
use crate::execution::http::interceptor::HttpRequestContext;
use async_trait::async_trait;
use reqwest::header::HeaderMap;

/// HTTP verbs used by the queue protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

/// Transport-level request data.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub ctx: HttpRequestContext,
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    /// Encoded body; `None` for GET requests
    pub body: Option<Vec<u8>>,
}

impl HttpTransportRequest {
    /// Body parsed as JSON, if any. Mostly useful in tests.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpTransportResponse {
    /// Whether the status code is at most 299.
    pub fn is_success(&self) -> bool {
        self.status <= 299
    }
}

/// Custom HTTP transport.
///
/// Implementations must be safe to call from many poll sessions at once.
/// Only network-level failures should be reported as `Err`; any HTTP status,
/// including 4xx/5xx, is returned as a response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpTransportRequest)
    -> Result<HttpTransportResponse, RelayError>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, RelayError> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpTransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_maps_to_reqwest() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(HttpMethod::Put), reqwest::Method::PUT);
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[test]
    fn success_boundary_is_299() {
        let mut response = HttpTransportResponse {
            status: 299,
            headers: HeaderMap::new(),
            body: Vec::new(),
        };
        assert!(response.is_success());
        response.status = 300;
        assert!(!response.is_success());
    }
}
