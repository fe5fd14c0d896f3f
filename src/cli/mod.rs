use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Relay that forwards widget questions to a chat-completion API", long_about = None)]
pub struct Args {
    // --- Provider Args ---
    /// API Key for the chat-completion provider. The server still starts without it.
    #[arg(long, env = "OPENAI_API_KEY")]
    pub api_key: Option<String>,

    /// Model name for chat completion (e.g., gpt-4o-mini, gpt-4o)
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// Full URL of the chat completions endpoint
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1/chat/completions")]
    pub base_url: String,

    /// Maximum tokens requested for each reply
    #[arg(long, env = "MAX_TOKENS", default_value = "600")]
    pub max_tokens: u32,

    /// Sampling temperature used when the request does not carry a numeric one
    #[arg(long, env = "DEFAULT_TEMPERATURE", default_value = "0.7")]
    pub default_temperature: f64,

    /// Seconds to wait for the provider before failing the request. 0 disables the timeout.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,

    /// System instruction placed first in every prompt, unless the request overrides it
    #[arg(long, env = "SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,

    // --- Server Args ---
    /// Interface the HTTP server binds to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Terminal chat panel backed by the agent relay", long_about = None)]
pub struct ChatArgs {
    /// Relay endpoint the widget posts questions to
    #[arg(long, env = "RELAY_URL", default_value = "http://localhost:3000/api/agent")]
    pub relay_url: String,

    /// Directory holding the persisted chat history
    #[arg(long, env = "HISTORY_DIR", default_value = ".barkada")]
    pub history_dir: String,

    /// Storage key of the persisted history
    #[arg(long, env = "HISTORY_KEY", default_value = "barkada_agent_history_v1")]
    pub history_key: String,

    /// Number of messages kept in persisted history
    #[arg(long, env = "HISTORY_LIMIT", default_value = "200")]
    pub history_limit: usize,

    /// Number of previous messages sent as context with each question
    #[arg(long, env = "CONTEXT_MESSAGES", default_value = "24")]
    pub context_messages: usize,

    /// Reply style (sampling temperature) sent with each question
    #[arg(long, env = "TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Name shown in the typing indicator
    #[arg(long, env = "ASSISTANT_NAME", default_value = "BaldKids")]
    pub assistant_name: String,
}
