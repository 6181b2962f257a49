pub mod http;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use self::http::HttpChatClient;
use crate::config::{ ErrorMessages, TransportConfig };
use crate::models::chat::{ ChatMessage, HealthStatus };

/// Failure kinds produced directly by the HTTP layer. Every kind is terminal
/// for its request: no retries, no backoff.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("server returned HTTP {code}")]
    Status {
        code: u16,
        body: String,
    },
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl TransportError {
    /// The fixed user-facing string for this failure kind.
    pub fn user_message<'a>(&self, messages: &'a ErrorMessages) -> &'a str {
        match self {
            TransportError::Timeout => &messages.timeout,
            TransportError::Network(_) => &messages.network,
            TransportError::Status { .. } => &messages.server,
            TransportError::Decode(_) => &messages.unknown,
        }
    }
}

pub(crate) fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_decode() {
        TransportError::Decode(err)
    } else {
        TransportError::Network(err)
    }
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send one user message plus prior history, returning the extracted
    /// reply text.
    async fn send_chat(
        &self,
        message: &str,
        history: &[ChatMessage]
    ) -> Result<String, TransportError>;

    /// Probe the backend. Failures are reported in the returned status,
    /// never raised.
    async fn check_health(&self) -> HealthStatus;
}

pub fn new_client(config: TransportConfig) -> Arc<dyn ChatService> {
    Arc::new(HttpChatClient::new(config))
}

/// Locate the reply text in a response body: the primary key first, then each
/// fallback key in order. A key only counts when its value is a non-empty
/// string; otherwise the fixed placeholder is returned.
pub fn extract_reply(config: &TransportConfig, body: &Value) -> String {
    let keys = std::iter
        ::once(config.reply_key.as_str())
        .chain(config.reply_fallback_keys.iter().map(String::as_str));

    for key in keys {
        if let Some(text) = body.get(key).and_then(Value::as_str) {
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }

    config.reply_placeholder.clone()
}
