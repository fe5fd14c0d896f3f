pub mod prompt;

use crate::cli::{ Args, ChatArgs };
use std::time::Duration;

pub const DEFAULT_HISTORY_KEY: &str = "barkada_agent_history_v1";
pub const DEFAULT_HISTORY_LIMIT: usize = 200;
pub const DEFAULT_CONTEXT_MESSAGES: usize = 24;

pub const DEFAULT_QUICK_REPLIES: [&str; 6] = [
    "Tell me about upcoming events",
    "Show the gallery highlights",
    "Plan a meetup for 5 people",
    "What makes our barkada special?",
    "Help with event planning",
    "Share a fun fact about us",
];

/// Process-wide relay settings, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub default_temperature: f64,
    pub request_timeout: Option<Duration>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            system_prompt: prompt::DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 600,
            default_temperature: 0.7,
            request_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl From<&Args> for RelayConfig {
    fn from(args: &Args) -> Self {
        Self {
            api_key: args.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: args.model.clone(),
            base_url: args.base_url.clone(),
            system_prompt: args.system_prompt
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| prompt::DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: args.max_tokens,
            default_temperature: args.default_temperature,
            request_timeout: Some(args.request_timeout_secs)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub storage_key: String,
    pub history_limit: usize,
    pub context_messages: usize,
    pub assistant_name: String,
    pub quick_replies: Vec<String>,
}

impl WidgetConfig {
    pub fn typing_label(&self) -> String {
        format!("{} is typing…", self.assistant_name)
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_HISTORY_KEY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            context_messages: DEFAULT_CONTEXT_MESSAGES,
            assistant_name: "BaldKids".to_string(),
            quick_replies: DEFAULT_QUICK_REPLIES.iter().map(|q| q.to_string()).collect(),
        }
    }
}

impl From<&ChatArgs> for WidgetConfig {
    fn from(args: &ChatArgs) -> Self {
        Self {
            storage_key: args.history_key.clone(),
            history_limit: args.history_limit,
            context_messages: args.context_messages,
            assistant_name: args.assistant_name.clone(),
            ..Self::default()
        }
    }
}
