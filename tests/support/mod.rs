//! Shared test doubles: a scripted transport that records every request.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relaykit::execution::http::{HttpTransport, HttpTransportRequest, HttpTransportResponse};
use relaykit::prelude::*;
use reqwest::header::HeaderMap;

enum Scripted {
    Reply(Result<HttpTransportResponse, RelayError>),
    /// Record the request, then never answer
    Stall,
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub request: HttpTransportRequest,
    pub at: tokio::time::Instant,
}

/// Replays queued responses in order and records what was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_raw(status, body.to_string());
    }

    pub fn push_raw(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(Ok(HttpTransportResponse {
                status,
                headers: HeaderMap::new(),
                body: body.into().into_bytes(),
            })));
    }

    pub fn push_error(&self, error: RelayError) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted::Reply(Err(error)));
    }

    pub fn push_stall(&self) {
        self.responses.lock().unwrap().push_back(Scripted::Stall);
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, RelayError> {
        self.seen.lock().unwrap().push(SeenRequest {
            request,
            at: tokio::time::Instant::now(),
        });
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(reply)) => reply,
            Some(Scripted::Stall) => futures::future::pending().await,
            None => Err(RelayError::TransportError("script exhausted".into())),
        }
    }
}

pub const FAL_STATUS_URL: &str =
    "https://queue.fal.run/fal-ai/fast-sdxl/requests/764cabcf/status";
pub const FAL_RESPONSE_URL: &str = "https://queue.fal.run/fal-ai/fast-sdxl/requests/764cabcf";
pub const FAL_CANCEL_URL: &str =
    "https://queue.fal.run/fal-ai/fast-sdxl/requests/764cabcf/cancel";

pub fn fal_created() -> serde_json::Value {
    serde_json::json!({
        "status": "IN_QUEUE",
        "request_id": "764cabcf",
        "status_url": FAL_STATUS_URL,
        "response_url": FAL_RESPONSE_URL,
        "cancel_url": FAL_CANCEL_URL,
        "queue_position": 2
    })
}

pub fn fal_status(status: &str) -> serde_json::Value {
    serde_json::json!({
        "status": status,
        "request_id": "764cabcf",
        "status_url": FAL_STATUS_URL,
        "response_url": FAL_RESPONSE_URL,
        "cancel_url": FAL_CANCEL_URL
    })
}

/// Fal client routed at the real queue host, sending through `transport`.
pub fn fal_client(transport: Arc<ScriptedTransport>) -> QueueClient {
    QueueClient::builder()
        .fal()
        .api_key("test-key")
        .base_url("https://queue.fal.run")
        .fetch(transport)
        .build()
        .expect("client builds")
}

pub fn url(s: &str) -> reqwest::Url {
    reqwest::Url::parse(s).expect("valid url")
}
