use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Backend Args ---
    /// Base URL of the chat backend (e.g., http://localhost:8001)
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8001")]
    pub backend_url: String,

    /// Route of the chat endpoint, relative to the base URL.
    #[arg(long, env = "CHAT_PATH", default_value = "/api/chat")]
    pub chat_path: String,

    /// Route of the health endpoint, relative to the base URL.
    #[arg(long, env = "HEALTH_PATH", default_value = "/api/health")]
    pub health_path: String,

    /// Timeout in seconds for a chat request.
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value = "30")]
    pub chat_timeout_secs: u64,

    /// Timeout in seconds for a health probe.
    #[arg(long, env = "HEALTH_TIMEOUT_SECS", default_value = "5")]
    pub health_timeout_secs: u64,

    /// Extra header sent with every request, as "Name: value". Repeatable;
    /// separate multiple headers with ';' when set via the environment.
    #[arg(long = "header", env = "EXTRA_HEADERS", value_delimiter = ';')]
    pub headers: Vec<String>,

    // --- Reply Extraction Args ---
    /// Primary JSON key holding the assistant reply.
    #[arg(long, env = "REPLY_KEY", default_value = "response")]
    pub reply_key: String,

    /// Comma-separated fallback JSON keys tried in order when the primary key is missing.
    #[arg(long, env = "REPLY_FALLBACK_KEYS", default_value = "message,content,text,reply")]
    pub reply_fallback_keys: String,

    // --- General App Args ---
    /// Maximum number of trailing history messages sent with each request (0 = unlimited).
    #[arg(long, env = "HISTORY_LIMIT", default_value = "20")]
    pub history_limit: usize,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Run a single health probe and exit with a non-zero status if the backend is down.
    #[arg(long, default_value = "false")]
    pub check: bool,
}
