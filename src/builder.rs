//! Queue client builder.
//!
//! ```rust,no_run
//! use relaykit::prelude::*;
//! use std::time::Duration;
//!
//! # fn build() -> Result<QueueClient, RelayError> {
//! let client = QueueClient::builder()
//!     .fal()
//!     .api_key("fal-key")
//!     .base_url("https://proxy.example.com")
//!     .timeout(Duration::from_secs(30))
//!     .http_debug(true)
//!     .build()?;
//! # Ok(client)
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::client::QueueClient;
use crate::config::ClientConfig;
use crate::error::{RelayError, Result};
use crate::execution::http::{HttpInterceptor, HttpTransport, LoggingInterceptor, ReqwestTransport};
use crate::protocol::QueueProtocol;
use crate::types::HttpConfig;

/// Builder for [`QueueClient`].
///
/// Unset API key and base URL fall back to the environment (see
/// [`ClientConfig::from_env`]).
#[derive(Default)]
pub struct QueueClientBuilder {
    protocol: Option<Arc<dyn QueueProtocol>>,
    api_key: Option<String>,
    base_url: Option<String>,
    client_id: Option<String>,
    http_config: HttpConfig,
    http_client: Option<reqwest::Client>,
    transport: Option<Arc<dyn HttpTransport>>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
    http_debug: bool,
}

impl QueueClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the Fal queue protocol.
    #[cfg(feature = "fal")]
    pub fn fal(self) -> Self {
        self.protocol(crate::providers::FalQueue)
    }

    /// Use the Replicate predictions protocol.
    #[cfg(feature = "replicate")]
    pub fn replicate(self) -> Self {
        self.protocol(crate::providers::ReplicatePredictions)
    }

    /// Use a custom queue protocol.
    pub fn protocol<P: QueueProtocol + 'static>(mut self, protocol: P) -> Self {
        self.protocol = Some(Arc::new(protocol));
        self
    }

    /// Set the API key
    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Route every request through this URL (proxy or provider host).
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn client_id<S: Into<String>>(mut self, client_id: S) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    // === HTTP Basic Configuration ===

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http_config.timeout = Some(timeout);
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = Some(timeout);
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.http_config.user_agent = Some(user_agent.into());
        self
    }

    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.http_config.proxy = Some(proxy.into());
        self
    }

    /// Add a header sent with every request
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.http_config.headers.insert(key.into(), value.into());
        self
    }

    /// Replace the whole HTTP configuration
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Set custom HTTP client (timeouts/proxy/user agent from this builder are then ignored)
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    // === HTTP Advanced Configuration ===

    /// Replace the transport entirely (custom fetch). Takes precedence over
    /// `with_http_client`.
    pub fn fetch(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Add a custom HTTP interceptor (order preserved)
    pub fn with_http_interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Install the built-in `LoggingInterceptor`
    pub fn http_debug(mut self, enabled: bool) -> Self {
        self.http_debug = enabled;
        self
    }

    pub fn build(self) -> Result<QueueClient> {
        self.build_with_lookup(|key| std::env::var(key).ok())
    }

    /// Unset key and base URL are read through `lookup`; blank values count as unset.
    pub(crate) fn build_with_lookup<F>(self, lookup: F) -> Result<QueueClient>
    where
        F: Fn(&str) -> Option<String>,
    {
        let protocol = self.protocol.ok_or_else(|| {
            RelayError::ConfigurationError("no queue protocol selected".to_string())
        })?;

        let mut config = match self.api_key {
            Some(key) => {
                let base_url = self
                    .base_url
                    .clone()
                    .or_else(|| {
                        lookup(crate::config::BASE_URL_ENV).filter(|v| !v.trim().is_empty())
                    })
                    .unwrap_or_else(|| protocol.default_base_url().to_string());
                ClientConfig::new(base_url, key)
            }
            None => ClientConfig::from_lookup(protocol.as_ref(), &lookup)?,
        };
        if let Some(base_url) = self.base_url {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(client_id) = self.client_id {
            config.client_id = Some(client_id);
        }
        config.http = self.http_config;

        let transport: Arc<dyn HttpTransport> = match (self.transport, self.http_client) {
            (Some(transport), _) => transport,
            (None, Some(client)) => Arc::new(ReqwestTransport::new(client)),
            (None, None) => Arc::new(ReqwestTransport::new(config.http.build_client()?)),
        };

        let mut interceptors = self.interceptors;
        if self.http_debug {
            interceptors.push(Arc::new(LoggingInterceptor));
        }

        QueueClient::with_transport(protocol, config, transport, interceptors)
    }
}
