//! Client configuration.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{RelayError, Result};
use crate::protocol::QueueProtocol;
use crate::types::HttpConfig;

/// Environment variable holding the API key (takes precedence over provider variables).
pub const API_KEY_ENV: &str = "RELAYKIT_API_KEY";
/// Environment variable overriding the base URL requests are routed through.
pub const BASE_URL_ENV: &str = "RELAYKIT_BASE_URL";
/// Environment variable holding an optional client identifier.
pub const CLIENT_ID_ENV: &str = "RELAYKIT_CLIENT_ID";

/// Header carrying the client identifier, when one is configured.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Connection settings for one provider.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Every request, including status and result locators, is routed through this URL.
    /// Point it at a proxy or at the provider's own queue host.
    pub base_url: String,
    /// API key (or proxy key) injected by the provider protocol
    pub api_key: SecretString,
    /// Optional client identifier forwarded as `x-client-id`
    pub client_id: Option<String>,
    /// HTTP settings for the default transport
    pub http: HttpConfig,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            api_key: SecretString::from(api_key.into()),
            client_id: None,
            http: HttpConfig::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `RELAYKIT_API_KEY`, falling back to the provider's own variable
    ///   (`FAL_KEY`, `REPLICATE_API_TOKEN`)
    /// - `RELAYKIT_BASE_URL`, falling back to the provider's queue host
    /// - `RELAYKIT_CLIENT_ID` (optional)
    pub fn from_env(protocol: &dyn QueueProtocol) -> Result<Self> {
        Self::from_lookup(protocol, |key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(protocol: &dyn QueueProtocol, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_ENV)
            .or_else(|| non_empty(protocol.api_key_env()))
            .ok_or_else(|| {
                RelayError::ConfigurationError(format!(
                    "no API key found; set {API_KEY_ENV} or {}",
                    protocol.api_key_env()
                ))
            })?;
        let base_url =
            non_empty(BASE_URL_ENV).unwrap_or_else(|| protocol.default_base_url().to_string());

        let mut config = Self::new(base_url, api_key);
        config.client_id = non_empty(CLIENT_ID_ENV);
        Ok(config)
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Headers shared by every request regardless of provider: configured
    /// extras plus the client identifier.
    pub fn common_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (k, v) in &self.http.headers {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
                RelayError::ConfigurationError(format!("invalid header name '{k}': {e}"))
            })?;
            headers.insert(name, HeaderValue::from_str(v)?);
        }
        if let Some(client_id) = &self.client_id {
            headers.insert(CLIENT_ID_HEADER, HeaderValue::from_str(client_id)?);
        }
        Ok(headers)
    }

    /// Build an authorization header value, marked sensitive.
    pub(crate) fn auth_header(&self, scheme: &str) -> Result<HeaderValue> {
        let mut value =
            HeaderValue::from_str(&format!("{scheme} {}", self.api_key.expose_secret()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(all(test, feature = "fal"))]
mod tests {
    use super::*;
    use crate::providers::fal::FalQueue;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn provider_key_is_used_when_generic_key_missing() {
        let config =
            ClientConfig::from_lookup(&FalQueue, lookup(&[("FAL_KEY", "fal-secret")])).unwrap();
        assert_eq!(config.api_key.expose_secret(), "fal-secret");
        assert_eq!(config.base_url, "https://queue.fal.run");
        assert!(config.client_id.is_none());
    }

    #[test]
    fn generic_variables_take_precedence() {
        let config = ClientConfig::from_lookup(
            &FalQueue,
            lookup(&[
                ("FAL_KEY", "fal-secret"),
                (API_KEY_ENV, "proxy-key"),
                (BASE_URL_ENV, "https://proxy.example.com/"),
                (CLIENT_ID_ENV, "device-1"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api_key.expose_secret(), "proxy-key");
        assert_eq!(config.base_url, "https://proxy.example.com");
        assert_eq!(config.client_id.as_deref(), Some("device-1"));
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = ClientConfig::from_lookup(&FalQueue, lookup(&[(API_KEY_ENV, "  ")])).unwrap_err();
        assert!(matches!(err, RelayError::ConfigurationError(_)));
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let config = ClientConfig::new("https://queue.fal.run", "super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn common_headers_include_extras_and_client_id() {
        let http = HttpConfig::builder().header("x-team", "vision").build();
        let config = ClientConfig::new("https://queue.fal.run", "k")
            .with_client_id("device-7")
            .with_http_config(http);
        let headers = config.common_headers().unwrap();
        assert_eq!(headers.get("x-team").unwrap(), "vision");
        assert_eq!(headers.get(CLIENT_ID_HEADER).unwrap(), "device-7");
    }
}
