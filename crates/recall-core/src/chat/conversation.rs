//! Running conversation history.

use recall_types::llm::{Message, MessageRole};

/// The user/assistant message history of one chat session.
///
/// The system prompt is sent separately (not as a message) per the
/// Anthropic API convention.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    history: Vec<Message>,
}

impl Conversation {
    /// Start an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user message to the history.
    pub fn add_user_message(&mut self, content: String) {
        self.history.push(Message {
            role: MessageRole::User,
            content,
        });
    }

    /// Add an assistant message to the history.
    pub fn add_assistant_message(&mut self, content: String) {
        self.history.push(Message {
            role: MessageRole::Assistant,
            content,
        });
    }

    /// The message list for an LLM request.
    pub fn build_messages(&self) -> Vec<Message> {
        self.history.clone()
    }

    /// The most recent assistant message, if any.
    pub fn last_assistant_message(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.as_str())
    }
}
