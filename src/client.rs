//! Queue client.
//!
//! [`QueueClient`] ties a [`QueueProtocol`] to a configuration, a transport and
//! a set of interceptors. The job operations themselves live in
//! [`crate::queue`] as `impl QueueClient` blocks.

use std::sync::Arc;

use crate::builder::QueueClientBuilder;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::execution::http::{
    HttpExecutionConfig, HttpInterceptor, HttpTransport, ReqwestTransport,
};
use crate::protocol::QueueProtocol;

/// Client for one provider's job queue.
///
/// Cloning is cheap; clones share the transport and protocol.
#[derive(Clone)]
pub struct QueueClient {
    pub(crate) protocol: Arc<dyn QueueProtocol>,
    pub(crate) config: ClientConfig,
    pub(crate) http: HttpExecutionConfig,
}

impl std::fmt::Debug for QueueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueClient")
            .field("provider_id", &self.protocol.provider_id())
            .field("expected_host", &self.protocol.expected_host())
            .field("config", &self.config)
            .finish()
    }
}

impl QueueClient {
    /// Create a client using the default reqwest transport.
    pub fn new<P: QueueProtocol + 'static>(protocol: P, config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.http.build_client()?));
        Self::with_transport(Arc::new(protocol), config, transport, Vec::new())
    }

    /// Create a client with an explicit transport and interceptors.
    pub fn with_transport(
        protocol: Arc<dyn QueueProtocol>,
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        interceptors: Vec<Arc<dyn HttpInterceptor>>,
    ) -> Result<Self> {
        let base_headers = protocol.build_headers(&config)?;
        let http = HttpExecutionConfig {
            provider_id: protocol.provider_id().to_string(),
            transport,
            base_headers,
            interceptors,
        };
        Ok(Self {
            protocol,
            config,
            http,
        })
    }

    pub fn builder() -> QueueClientBuilder {
        QueueClientBuilder::new()
    }

    pub fn provider_id(&self) -> &'static str {
        self.protocol.provider_id()
    }

    /// Base URL every request is routed through.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn protocol(&self) -> &dyn QueueProtocol {
        self.protocol.as_ref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
