//! Conversation entity - A sequence of chat messages
//!
//! Holds the turn history for one session. The system prompt is never stored
//! here; it is injected at payload-build time so a persona switch reframes
//! future turns without rewriting past ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChatMessage, MessageRole};

/// Ordered message history for a single session (oldest first)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Messages in the conversation, chronological
    pub messages: Vec<ChatMessage>,
    /// When the conversation started
    pub created_at: DateTime<Utc>,
    /// When the conversation was last updated
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a message to the conversation
    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Add a user message
    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add_message(ChatMessage::user(content));
    }

    /// Add an assistant message
    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.add_message(ChatMessage::assistant(content));
    }

    /// Get the last message in the conversation
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Get the last user message
    pub fn last_user_message(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
    }

    /// Get the number of messages
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Check if the conversation is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Remove all messages, keeping the conversation's identity
    pub fn clear(&mut self) {
        self.messages.clear();
        self.updated_at = Utc::now();
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversation_is_empty() {
        let conv = Conversation::new();
        assert!(conv.is_empty());
        assert_eq!(conv.message_count(), 0);
    }

    #[test]
    fn messages_can_be_added() {
        let mut conv = Conversation::new();
        conv.add_user_message("Hello");
        conv.add_assistant_message("Hi there!");

        assert_eq!(conv.message_count(), 2);
        assert_eq!(conv.last_message().unwrap().content, "Hi there!");
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut conv = Conversation::new();
        conv.add_user_message("first");
        conv.add_assistant_message("second");
        conv.add_user_message("third");

        let contents: Vec<&str> = conv.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn last_user_message_is_found() {
        let mut conv = Conversation::new();
        conv.add_user_message("First question");
        conv.add_assistant_message("First answer");
        conv.add_user_message("Second question");
        conv.add_assistant_message("Second answer");

        let last_user = conv.last_user_message().unwrap();
        assert_eq!(last_user.content, "Second question");
    }

    #[test]
    fn last_message_returns_none_for_empty_conversation() {
        let conv = Conversation::new();
        assert!(conv.last_message().is_none());
    }

    #[test]
    fn clear_removes_all_messages() {
        let mut conv = Conversation::new();
        conv.add_user_message("Hello");
        conv.add_assistant_message("Hi");
        conv.clear();

        assert!(conv.is_empty());
    }

    #[test]
    fn add_message_updates_timestamp() {
        let mut conv = Conversation::new();
        let before = conv.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));
        conv.add_user_message("Hello");
        assert!(conv.updated_at > before);
    }

    #[test]
    fn default_creates_new_conversation() {
        let conv = Conversation::default();
        assert!(conv.is_empty());
    }
}
