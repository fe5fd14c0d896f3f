pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::RelayConfig;
use self::openai::OpenAIChatClient;

/// Wire body of a chat-completions call. `messages` is kept as raw JSON so
/// caller-supplied history is forwarded exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Value>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider responded with status {status}")]
    Status { status: u16, body: Value },
    #[error("provider response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid provider configuration: {0}")]
    Config(String),
}

impl ProviderError {
    /// Diagnostic payload surfaced to the caller: the provider's own error body
    /// when it sent one, otherwise the error message.
    pub fn details(&self) -> Value {
        match self {
            ProviderError::Status { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Performs exactly one completion call and returns the decoded response body.
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, ProviderError>;

    fn get_model(&self) -> String;
}

/// Text of the first choice, accepting both chat (`message.content`) and
/// legacy completion (`text`) shapes. Empty or non-string content yields `None`.
pub fn extract_reply(response: &Value) -> Option<String> {
    let choice = response.get("choices")?.as_array()?.first()?;
    let text = match choice.get("message").filter(|m| !m.is_null()) {
        Some(message) => message.get("content"),
        None => choice.get("text"),
    };
    text.and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn new_client(config: &RelayConfig) -> Result<Arc<dyn ChatClient>, ProviderError> {
    let client = OpenAIChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
