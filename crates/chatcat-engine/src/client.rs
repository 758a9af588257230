//! Backend client for the chat service.
//!
//! The widget only talks to the backend through [`ChatBackend`], so tests and
//! the TUI can substitute their own implementation. [`HttpBackend`] is the
//! real one: a single JSON `POST` per user message, no retry, no timeout.

use crate::chat::{ChatReply, ChatRequest};
use crate::config::Config;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Something that can answer a [`ChatRequest`].
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one request and wait for the reply.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError>;
}

/// Chat backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    chat_url: String,
    health_url: String,
}

impl HttpBackend {
    /// Create a backend for explicit endpoint URLs.
    pub fn new(
        chat_url: impl Into<String>,
        health_url: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(TransportError::Network)?;
        Ok(Self {
            client,
            chat_url: chat_url.into(),
            health_url: health_url.into(),
        })
    }

    /// Create a backend for the endpoints named in a config.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(config.chat_url(), config.health_url())
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Query the backend health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(TransportError::Network)?;
        let body = read_success_body(response).await?;
        serde_json::from_str(&body).map_err(TransportError::Malformed)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        debug!(url = %self.chat_url, turns = request.history.len(), "POST chat");
        let response = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(TransportError::Network)?;
        let body = read_success_body(response).await?;
        serde_json::from_str(&body).map_err(TransportError::Malformed)
    }
}

/// Read the body of a response, turning non-2xx statuses into errors.
async fn read_success_body(response: reqwest::Response) -> Result<String, TransportError> {
    let status = response.status();
    if !status.is_success() {
        // The body is shown to the user verbatim; an unreadable one is just empty.
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }
    response.text().await.map_err(TransportError::Network)
}

/// Response body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Errors talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Backend answered with a non-2xx status.
    #[error("Backend {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection or I/O failure.
    #[error("{0}")]
    Network(#[source] reqwest::Error),

    /// 2xx response whose body did not match the expected schema.
    #[error("malformed response: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The task carrying the request ended without an answer.
    #[error("request aborted: {0}")]
    Aborted(String),
}
