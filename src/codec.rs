//! JSON codec for request inputs and job outputs.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{RelayError, Result};

/// Serialize a typed input into a JSON value.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| RelayError::EncodeError(e.to_string()))
}

/// Serialize a JSON value into request body bytes.
pub fn encode(value: &serde_json::Value) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| RelayError::EncodeError(e.to_string()))
}

/// Parse a response body into a JSON value.
pub fn decode_value(bytes: &[u8]) -> Result<serde_json::Value> {
    serde_json::from_slice(bytes).map_err(|e| {
        RelayError::DecodeError(format!(
            "response is not valid JSON: {e}; body_sample={}",
            body_sample(bytes)
        ))
    })
}

/// Decode a JSON value into the caller's output type.
pub fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        RelayError::DecodeError(format!(
            "failed to decode {}: {e}",
            std::any::type_name::<T>()
        ))
    })
}

// Limit body sample size to avoid noisy errors
fn body_sample(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Output {
        url: String,
    }

    #[test]
    fn invalid_json_is_a_decode_error_with_sample() {
        let err = decode_value(b"<html>gateway</html>").unwrap_err();
        match err {
            RelayError::DecodeError(msg) => assert!(msg.contains("<html>gateway</html>")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn schema_mismatch_names_the_target_type() {
        let err = from_value::<Output>(serde_json::json!({"uri": "x"})).unwrap_err();
        match err {
            RelayError::DecodeError(msg) => assert!(msg.contains("Output")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn encode_produces_json_bytes() {
        let bytes = encode(&serde_json::json!({"prompt": "a cat"})).unwrap();
        assert_eq!(bytes, br#"{"prompt":"a cat"}"#);
    }
}
