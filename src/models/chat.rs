use serde::{ Serialize, Deserialize };
use std::fmt;

/// Author of a message in the widget history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Who {
    User,
    Agent,
}

impl Who {
    /// Role name the provider expects for this author.
    pub fn role(self) -> Role {
        match self {
            Who::User => Role::User,
            Who::Agent => Role::Assistant,
        }
    }
}

impl fmt::Display for Who {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Who::User => write!(f, "user"),
            Who::Agent => write!(f, "agent"),
        }
    }
}

/// One persisted history entry. `t` is milliseconds since the epoch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub who: Who,
    pub text: String,
    #[serde(rename = "t", default)]
    pub timestamp: i64,
}

impl StoredMessage {
    pub fn new(who: Who, text: impl Into<String>) -> Self {
        Self {
            who,
            text: text.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn to_context(&self) -> ContextMessage {
        ContextMessage {
            role: self.who.role(),
            content: self.text.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /api/agent` as the widget sends it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ContextMessage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_message_uses_short_timestamp_key() {
        let msg = StoredMessage { who: Who::Agent, text: "hi".into(), timestamp: 42 };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({ "who": "agent", "text": "hi", "t": 42 }));
    }

    #[test]
    fn chat_request_omits_unset_fields() {
        let req = ChatRequest { question: "Hello".into(), ..Default::default() };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "question": "Hello" }));
    }

    #[test]
    fn agent_maps_to_assistant_role() {
        let msg = StoredMessage::new(Who::Agent, "reply");
        let ctx = msg.to_context();
        assert_eq!(serde_json::to_value(&ctx).unwrap(), json!({ "role": "assistant", "content": "reply" }));
    }
}
