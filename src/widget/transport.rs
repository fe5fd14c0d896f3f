use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use thiserror::Error;

use crate::models::chat::ChatRequest;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to relay failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("relay response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// What came back from the relay: the HTTP status and the decoded JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayReply {
    pub status: u16,
    pub body: Value,
}

impl RelayReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `reply` field of a successful response, if it is a non-empty string.
    pub fn reply_text(&self) -> Option<&str> {
        if !self.is_success() {
            return None;
        }
        self.body.get("reply").and_then(Value::as_str).filter(|r| !r.is_empty())
    }
}

#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<RelayReply, TransportError>;
}

pub struct HttpTransport {
    http: HttpClient,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { http: HttpClient::new(), endpoint: endpoint.into() }
    }
}

#[async_trait]
impl RelayTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<RelayReply, TransportError> {
        let resp = self.http.post(&self.endpoint).json(request).send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;
        Ok(RelayReply { status, body })
    }
}
