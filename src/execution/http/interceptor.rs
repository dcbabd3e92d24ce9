//! HTTP Interceptor interfaces
//!
//! Interceptors can observe and tweak requests before send, observe responses,
//! and be notified of errors. The hooks are best-effort and should avoid
//! expensive work by default.

use crate::error::RelayError;
use crate::execution::http::transport::{HttpTransportRequest, HttpTransportResponse};

/// What a request is doing within the job lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueOperation {
    Submit,
    Status,
    Fetch,
    Cancel,
}

impl std::fmt::Display for QueueOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueOperation::Submit => write!(f, "submit"),
            QueueOperation::Status => write!(f, "status"),
            QueueOperation::Fetch => write!(f, "fetch"),
            QueueOperation::Cancel => write!(f, "cancel"),
        }
    }
}

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    pub provider_id: String,
    pub operation: QueueOperation,
    pub url: String,
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before sending a request. Interceptors may add headers or
    /// otherwise modify the request, or return an error to short-circuit it.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        _request: &mut HttpTransportRequest,
    ) -> Result<(), RelayError> {
        Ok(())
    }

    /// Called after any response is received, before status classification.
    fn on_response(
        &self,
        _ctx: &HttpRequestContext,
        _response: &HttpTransportResponse,
    ) -> Result<(), RelayError> {
        Ok(())
    }

    /// Called when an error occurs during sending or classification.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &RelayError) {}
}

/// A simple logging interceptor backed by `tracing` (no sensitive data).
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        request: &mut HttpTransportRequest,
    ) -> Result<(), RelayError> {
        tracing::debug!(target: "relaykit::http", provider=%ctx.provider_id, op=%ctx.operation, method=%request.method, url=%ctx.url, "sending request");
        Ok(())
    }

    fn on_response(
        &self,
        ctx: &HttpRequestContext,
        response: &HttpTransportResponse,
    ) -> Result<(), RelayError> {
        tracing::debug!(target: "relaykit::http", provider=%ctx.provider_id, op=%ctx.operation, url=%ctx.url, status=%response.status, bytes=response.body.len(), "response received");
        Ok(())
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &RelayError) {
        tracing::debug!(target: "relaykit::http", provider=%ctx.provider_id, op=%ctx.operation, url=%ctx.url, err=%error, "request error");
    }
}
