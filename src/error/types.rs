//! Core error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Status code and verbatim body of an HTTP response whose status exceeded 299.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// HTTP status code reported by the transport
    pub status_code: u16,
    /// Raw response body, lossily decoded as UTF-8
    pub raw_body: String,
}

impl ErrorEnvelope {
    pub fn new(status_code: u16, raw_body: impl Into<String>) -> Self {
        Self {
            status_code,
            raw_body: raw_body.into(),
        }
    }

    /// Build an envelope from raw response bytes.
    pub fn from_bytes(status_code: u16, body: &[u8]) -> Self {
        Self {
            status_code,
            raw_body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

impl std::fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "status {}: {}", self.status_code, self.raw_body)
    }
}

/// Errors produced while submitting, polling, fetching or cancelling queue jobs.
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    /// Network-level failure reported by the transport.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The provider answered with a status code above 299.
    #[error("Unsuccessful request ({0})")]
    UnsuccessfulRequest(ErrorEnvelope),

    /// The create-job response carried no status URL.
    #[error("Job response did not include a status URL")]
    MissingStatusLocator,

    /// A completed job carried no response URL.
    #[error("Completed job did not include a response URL")]
    MissingResultLocator,

    /// The job handle carried no cancel URL.
    #[error("Job handle does not include a cancel URL")]
    MissingCancelLocator,

    /// A locator pointed at a host other than the provider's queue host.
    #[error("Unexpected domain: expected host '{expected}', found '{found}'")]
    UnexpectedDomain { expected: String, found: String },

    /// A locator was not an absolute URL with a host.
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    /// The poll attempt budget ran out while the job was still pending.
    #[error("Retry limit reached after {attempts} status checks")]
    RetryLimitReached { attempts: u32 },

    /// A response body did not match the expected schema.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The request input could not be serialized.
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// The provider reported the job as failed or canceled.
    #[error("Job ended with status '{status}'{}", detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    JobFailed {
        status: String,
        detail: Option<String>,
    },

    /// The poll session was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// Client configuration is incomplete or inconsistent.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A caller-supplied argument was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
