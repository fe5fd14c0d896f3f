pub mod error;

use log::{ error, info, warn };
use serde_json::{ json, Value };
use std::sync::Arc;

use crate::config::{ prompt::resolve_system_prompt, RelayConfig };
use crate::llm::{ extract_reply, ChatClient, CompletionRequest };
pub use self::error::{ RelayError, MISSING_QUESTION, UPSTREAM_FAILURE };

pub const NO_REPLY: &str = "Sorry, no reply.";

/// A request body that passed validation. Only `question` is checked; the
/// optional fields fall back to defaults when they have the wrong shape.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentQuery {
    pub question: String,
    pub temperature: Option<f64>,
    pub history: Vec<Value>,
    pub system_prompt: Option<String>,
}

impl AgentQuery {
    pub fn from_body(body: &Value) -> Result<Self, RelayError> {
        let question = body
            .get("question")
            .and_then(Value::as_str)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| RelayError::BadRequest(MISSING_QUESTION.to_string()))?;

        let history = body
            .get("messages")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            question: question.to_string(),
            temperature: body.get("temperature").and_then(Value::as_f64),
            history,
            system_prompt: body.get("systemPrompt").and_then(Value::as_str).map(str::to_string),
        })
    }
}

pub struct Relay {
    config: RelayConfig,
    client: Arc<dyn ChatClient>,
}

impl Relay {
    pub fn new(config: RelayConfig, client: Arc<dyn ChatClient>) -> Self {
        Self { config, client }
    }

    /// `[system, ...history, user(question)]`; history is forwarded untouched.
    pub fn build_messages(&self, query: &AgentQuery) -> Vec<Value> {
        let system = resolve_system_prompt(query.system_prompt.as_deref(), &self.config.system_prompt);
        let mut messages = Vec::with_capacity(query.history.len() + 2);
        messages.push(json!({ "role": "system", "content": system }));
        messages.extend(query.history.iter().cloned());
        messages.push(json!({ "role": "user", "content": query.question }));
        messages
    }

    pub fn build_request(&self, query: &AgentQuery) -> CompletionRequest {
        CompletionRequest {
            model: self.client.get_model(),
            messages: self.build_messages(query),
            max_tokens: self.config.max_tokens,
            temperature: query.temperature.unwrap_or(self.config.default_temperature),
        }
    }

    /// Validates a raw request body, calls the provider once, and returns the reply text.
    pub async fn handle(&self, body: &Value) -> Result<String, RelayError> {
        let query = AgentQuery::from_body(body).map_err(|e| {
            warn!("Rejecting request: {}", e);
            e
        })?;
        let request = self.build_request(&query);
        info!(
            "Forwarding question ({} context messages, temperature {}) to {}",
            query.history.len(),
            request.temperature,
            request.model
        );

        match self.client.complete(&request).await {
            Ok(response) => Ok(extract_reply(&response).unwrap_or_else(|| NO_REPLY.to_string())),
            Err(e) => {
                let details = e.details();
                error!("OpenAI error: {} {}", e, details);
                Err(RelayError::Upstream { message: UPSTREAM_FAILURE.to_string(), details })
            }
        }
    }
}
