//! Port definitions for chat backends

use async_trait::async_trait;
use domain::ChatMessage;
use serde::Serialize;

use crate::error::ChatError;

/// A message in wire form (OpenAI-compatible)
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }
}

/// Payload for one chat turn: the active system prompt plus the full history.
///
/// The system prompt is carried separately and prepended at serialization
/// time; it is never part of the stored history.
#[derive(Debug, Clone)]
pub struct ChatPayload {
    /// Active persona's system prompt
    pub system_prompt: String,
    /// Conversation turns, oldest first (user/assistant only)
    pub history: Vec<WireMessage>,
}

impl ChatPayload {
    /// Build a payload from the session's history
    #[must_use]
    pub fn new(system_prompt: impl Into<String>, history: &[ChatMessage]) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history: history.iter().map(WireMessage::from).collect(),
        }
    }

    /// Messages to send: the system prompt followed by the history
    #[must_use]
    pub fn wire_messages(&self) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(WireMessage {
            role: "system".to_string(),
            content: self.system_prompt.clone(),
        });
        messages.extend(self.history.iter().cloned());
        messages
    }
}

/// Port for chat completion backends
///
/// Implementations translate the payload into their native protocol and
/// return the assistant's reply text. All failures come back as typed
/// [`ChatError`] values.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run one completion over the full payload and return the reply text
    async fn complete(&self, payload: &ChatPayload) -> Result<String, ChatError>;

    /// Short name of the backend for logs and diagnostics
    fn backend_name(&self) -> &'static str;
}
