use std::fmt;
use std::time::Duration;
use url::Url;

use crate::cli::Args;

const DEFAULT_BASE_URL: &str = "http://localhost:8001";
const DEFAULT_CHAT_PATH: &str = "/api/chat";
const DEFAULT_HEALTH_PATH: &str = "/api/health";
const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_REPLY_KEY: &str = "response";
const DEFAULT_REPLY_FALLBACK_KEYS: [&str; 4] = ["message", "content", "text", "reply"];
const DEFAULT_HISTORY_LIMIT: usize = 20;

const DEFAULT_REPLY_PLACEHOLDER: &str =
    "Sorry, I couldn't come up with a response. Please try again.";

#[derive(Debug)]
pub enum ConfigError {
    InvalidBaseUrl(url::ParseError),
    InvalidHeader(String),
    EmptyReplyKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl(e) => write!(f, "Invalid backend base URL: {}", e),
            ConfigError::InvalidHeader(line) =>
                write!(f, "Invalid header '{}', expected 'Name: value'", line),
            ConfigError::EmptyReplyKey => write!(f, "Reply key must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidBaseUrl(e) => Some(e),
            _ => None,
        }
    }
}

impl From<url::ParseError> for ConfigError {
    fn from(err: url::ParseError) -> Self {
        ConfigError::InvalidBaseUrl(err)
    }
}

/// The four fixed strings shown to the user when a chat request fails.
#[derive(Debug, Clone)]
pub struct ErrorMessages {
    pub timeout: String,
    pub network: String,
    pub server: String,
    pub unknown: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            timeout: "The request timed out. The backend may be busy, please try again."
                .to_string(),
            network: "Unable to reach the backend. Please check that it is running.".to_string(),
            server: "The backend returned an error. Please try again later.".to_string(),
            unknown: "Something unexpected went wrong. Please try again.".to_string(),
        }
    }
}

/// Immutable settings for the chat transport client, frozen at construction.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: Url,
    pub chat_path: String,
    pub health_path: String,
    pub chat_timeout: Duration,
    pub health_timeout: Duration,
    pub headers: Vec<(String, String)>,
    pub reply_key: String,
    pub reply_fallback_keys: Vec<String>,
    pub reply_placeholder: String,
    pub messages: ErrorMessages,
    pub history_limit: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            headers: Vec::new(),
            reply_key: DEFAULT_REPLY_KEY.to_string(),
            reply_fallback_keys: DEFAULT_REPLY_FALLBACK_KEYS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            reply_placeholder: DEFAULT_REPLY_PLACEHOLDER.to_string(),
            messages: ErrorMessages::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl TransportConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&args.backend_url)?;

        let reply_key = args.reply_key.trim().to_string();
        if reply_key.is_empty() {
            return Err(ConfigError::EmptyReplyKey);
        }

        let reply_fallback_keys = args.reply_fallback_keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();

        let headers = args.headers
            .iter()
            .map(|line| parse_header_line(line))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            base_url,
            chat_path: normalize_path(&args.chat_path),
            health_path: normalize_path(&args.health_path),
            chat_timeout: Duration::from_secs(args.chat_timeout_secs),
            health_timeout: Duration::from_secs(args.health_timeout_secs),
            headers,
            reply_key,
            reply_fallback_keys,
            reply_placeholder: DEFAULT_REPLY_PLACEHOLDER.to_string(),
            messages: ErrorMessages::default(),
            history_limit: args.history_limit,
        })
    }

    pub fn chat_url(&self) -> String {
        join_url(self.base_url.as_str(), &self.chat_path)
    }

    pub fn health_url(&self) -> String {
        join_url(self.base_url.as_str(), &self.health_path)
    }
}

fn join_url(base_url: &str, route: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), route)
}

fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn parse_header_line(line: &str) -> Result<(String, String), ConfigError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidHeader(line.to_string()))?;
    let name = name.trim();
    let value = value.trim();
    if name.is_empty() || value.is_empty() {
        return Err(ConfigError::InvalidHeader(line.to_string()));
    }
    Ok((name.to_string(), value.to_string()))
}
