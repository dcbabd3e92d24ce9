//! Conversions from common error types.

use super::types::RelayError;

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TransportError(format!("request timed out: {err}"))
        } else {
            Self::TransportError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::TransportError(err.to_string())
        } else {
            Self::DecodeError(err.to_string())
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for RelayError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::ConfigurationError(format!("invalid header value: {err}"))
    }
}
