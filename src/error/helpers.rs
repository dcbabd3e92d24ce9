//! Classification helpers for `RelayError`.

use super::types::{ErrorEnvelope, RelayError};

impl RelayError {
    /// Create an `UnsuccessfulRequest` from a status code and body text.
    pub fn unsuccessful(status_code: u16, raw_body: impl Into<String>) -> Self {
        Self::UnsuccessfulRequest(ErrorEnvelope::new(status_code, raw_body))
    }

    /// HTTP status code, when the error came from an unsuccessful response.
    pub fn status_code(&self) -> Option<u16> {
        self.envelope().map(|e| e.status_code)
    }

    /// The preserved response envelope, when there is one.
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            Self::UnsuccessfulRequest(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// Whether the poll budget was exhausted. Callers typically resubmit on this.
    pub fn is_retry_limit(&self) -> bool {
        matches!(self, Self::RetryLimitReached { .. })
    }

    /// Check if a caller-side retry has a reasonable chance of succeeding.
    ///
    /// Contract violations (missing locators, unexpected domains) and decode
    /// failures are never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransportError(_) => true,
            Self::UnsuccessfulRequest(envelope) => {
                envelope.status_code == 429 || (500..=599).contains(&envelope.status_code)
            }
            _ => false,
        }
    }

    /// Check if this is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status_code(), Some(code) if (400..500).contains(&code))
    }

    /// Check if this is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), Some(code) if code >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsuccessful_request_keeps_status_and_body() {
        let err = RelayError::unsuccessful(422, r#"{"detail":"bad prompt"}"#);
        assert_eq!(err.status_code(), Some(422));
        assert_eq!(
            err.envelope().map(|e| e.raw_body.as_str()),
            Some(r#"{"detail":"bad prompt"}"#)
        );
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn server_errors_and_rate_limits_are_retryable() {
        assert!(RelayError::unsuccessful(500, "").is_retryable());
        assert!(RelayError::unsuccessful(429, "slow down").is_retryable());
        assert!(RelayError::TransportError("reset".into()).is_retryable());
        assert!(RelayError::unsuccessful(503, "").is_server_error());
    }

    #[test]
    fn contract_violations_are_not_retryable() {
        assert!(!RelayError::MissingStatusLocator.is_retryable());
        assert!(!RelayError::MissingResultLocator.is_retryable());
        assert!(
            !RelayError::UnexpectedDomain {
                expected: "queue.fal.run".into(),
                found: "evil.example".into(),
            }
            .is_retryable()
        );
        assert!(!RelayError::DecodeError("eof".into()).is_retryable());
    }

    #[test]
    fn retry_limit_is_recognizable() {
        let err = RelayError::RetryLimitReached { attempts: 30 };
        assert!(err.is_retry_limit());
        assert_eq!(err.to_string(), "Retry limit reached after 30 status checks");
    }

    #[test]
    fn job_failed_display_includes_detail() {
        let err = RelayError::JobFailed {
            status: "failed".into(),
            detail: Some("CUDA out of memory".into()),
        };
        assert_eq!(
            err.to_string(),
            "Job ended with status 'failed': CUDA out of memory"
        );

        let bare = RelayError::JobFailed {
            status: "canceled".into(),
            detail: None,
        };
        assert_eq!(bare.to_string(), "Job ended with status 'canceled'");
    }
}
