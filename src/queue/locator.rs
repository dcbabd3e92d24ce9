//! Locator validation and routing.

use reqwest::Url;

use crate::client::QueueClient;
use crate::error::{RelayError, Result};

impl QueueClient {
    /// Check that `locator` points at the provider's queue host and return the
    /// URL the request should actually be sent to.
    ///
    /// No request is made when the host does not match.
    pub(crate) fn route_locator(&self, locator: &Url) -> Result<String> {
        validate_locator(locator, self.protocol.expected_host())?;
        Ok(route(&self.config.base_url, locator))
    }

    /// URL the create-job request for `model` is posted to.
    pub(crate) fn submit_url(&self, model: &str) -> String {
        format!("{}{}", self.config.base_url, self.protocol.submit_path(model))
    }
}

/// Fail with `UnexpectedDomain` unless `locator`'s authority is exactly
/// `expected_host` (ASCII case-insensitive) on the scheme's default port.
///
/// Credentials embedded in the locator make it `InvalidLocator`.
pub fn validate_locator(locator: &Url, expected_host: &str) -> Result<()> {
    let host = locator
        .host_str()
        .ok_or_else(|| RelayError::InvalidLocator(format!("'{locator}' has no host")))?;
    if !locator.username().is_empty() || locator.password().is_some() {
        return Err(RelayError::InvalidLocator(format!(
            "locator for '{host}' carries credentials"
        )));
    }

    // `port()` is `None` when the port is the scheme default.
    let found = match locator.port() {
        Some(port) => format!("{host}:{port}"),
        None if host.eq_ignore_ascii_case(expected_host) => return Ok(()),
        None => host.to_string(),
    };
    Err(RelayError::UnexpectedDomain {
        expected: expected_host.to_string(),
        found,
    })
}

/// Rebase `locator`'s path and query onto `base_url`.
pub fn route(base_url: &str, locator: &Url) -> String {
    let base = base_url.trim_end_matches('/');
    match locator.query() {
        Some(query) => format!("{base}{}?{query}", locator.path()),
        None => format!("{base}{}", locator.path()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn matching_host_passes_case_insensitively() {
        assert!(validate_locator(&url("https://QUEUE.fal.run/a/status"), "queue.fal.run").is_ok());
    }

    #[test]
    fn foreign_host_is_rejected() {
        let err = validate_locator(&url("https://evil.example.com/a"), "queue.fal.run").unwrap_err();
        match err {
            RelayError::UnexpectedDomain { expected, found } => {
                assert_eq!(expected, "queue.fal.run");
                assert_eq!(found, "evil.example.com");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn explicit_default_port_passes_and_other_ports_are_rejected() {
        assert!(validate_locator(&url("https://queue.fal.run:443/a/status"), "queue.fal.run").is_ok());

        let err = validate_locator(&url("https://queue.fal.run:8443/a/status"), "queue.fal.run")
            .unwrap_err();
        match err {
            RelayError::UnexpectedDomain { found, .. } => assert_eq!(found, "queue.fal.run:8443"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn locator_with_credentials_is_invalid() {
        let err = validate_locator(&url("https://user:pw@queue.fal.run/a/status"), "queue.fal.run")
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidLocator(_)));
    }

    #[test]
    fn hostless_locator_is_invalid() {
        let err = validate_locator(&url("data:text/plain,hi"), "queue.fal.run").unwrap_err();
        assert!(matches!(err, RelayError::InvalidLocator(_)));
    }

    #[test]
    fn route_keeps_path_and_query() {
        let locator = url("https://queue.fal.run/fal-ai/fast-sdxl/requests/abc/status?logs=1");
        assert_eq!(
            route("https://proxy.example.com/", &locator),
            "https://proxy.example.com/fal-ai/fast-sdxl/requests/abc/status?logs=1"
        );
        assert_eq!(
            route("https://queue.fal.run", &url("https://queue.fal.run/r/1")),
            "https://queue.fal.run/r/1"
        );
    }
}
