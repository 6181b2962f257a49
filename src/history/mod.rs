use crate::models::chat::{ ChatMessage, Role };

/// In-memory conversation log, oldest message first. This is the only state
/// the chat loop owns; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::Assistant, content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Render the log as `User:`/`Assistant:` lines for display.
    pub fn render_transcript(&self) -> String {
        let mut result = String::new();
        for msg in &self.messages {
            let role_display = match msg.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };

            result.push_str(&format!("{}: {}\n", role_display, msg.content));
        }

        result
    }
}
