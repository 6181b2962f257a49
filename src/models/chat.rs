use serde::{ Serialize, Deserialize };
use std::fmt;
use std::str::FromStr;

/// Author of a chat message, serialized in its lowercase wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseRoleError {
    message: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ =>
                Err(ParseRoleError {
                    message: format!("Invalid role: '{}'", s),
                }),
        }
    }
}

/// One entry of conversation history as it travels on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// POST body for the chat endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_history: Vec<ChatMessage>,
}

/// Result of a single health probe. Produced per call, never stored.
#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub status: u16,
    pub message: String,
}
