//! Conversation session
//!
//! Holds the ordered turn history and the active persona, and assembles the
//! payload for each chat call. The system prompt is resolved fresh on every
//! payload build and never stored in the history, so switching personas
//! mid-session reframes future calls without rewriting past turns.

use ai_chat::ChatPayload;
use domain::{Conversation, Persona, PersonaRegistry};

/// Session state for one conversation
#[derive(Debug)]
pub struct ConversationSession {
    history: Conversation,
    persona: Persona,
    registry: PersonaRegistry,
}

impl ConversationSession {
    /// New session with an empty history and the given persona
    #[must_use]
    pub fn new(persona: Persona) -> Self {
        Self {
            history: Conversation::new(),
            persona,
            registry: PersonaRegistry::new(),
        }
    }

    /// Append a user turn unconditionally
    pub fn append_user_turn(&mut self, text: impl Into<String>) {
        self.history.add_user_message(text);
    }

    /// Append an assistant turn only when the backend call succeeded.
    ///
    /// Error strings never enter the history; a failed turn leaves only the
    /// user message behind.
    pub fn append_assistant_turn_if_success(&mut self, text: impl Into<String>, was_error: bool) {
        if !was_error {
            self.history.add_assistant_message(text);
        }
    }

    /// Payload for the next chat call: the active persona's prompt plus the
    /// full history
    #[must_use]
    pub fn build_payload(&self) -> ChatPayload {
        let prompt = self.registry.prompt(self.persona);
        ChatPayload::new(prompt, &self.history.messages)
    }

    /// Active persona
    #[must_use]
    pub const fn persona(&self) -> Persona {
        self.persona
    }

    /// Switch the active persona; past turns are untouched
    pub fn set_persona(&mut self, persona: Persona) {
        self.persona = persona;
    }

    /// Number of stored turns
    #[must_use]
    pub fn turn_count(&self) -> usize {
        self.history.message_count()
    }

    /// Clear the history, keeping the persona
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new(Persona::default())
    }
}
