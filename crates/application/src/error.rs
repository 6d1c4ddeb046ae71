//! Application-level errors

use ai_chat::ChatError;
use ai_speech::SpeechError;
use thiserror::Error;

use crate::router::Capability;

/// Errors surfaced by the assistant facade
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The capability has no configured backend; raised before any adapter
    /// or network work happens
    #[error("No backend is configured for {0}")]
    Unavailable(Capability),

    /// A chat backend call failed
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// A speech backend call failed
    #[error(transparent)]
    Speech(#[from] SpeechError),

    /// Adapter construction failed during load or reload
    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_names_the_capability() {
        let err = AssistantError::Unavailable(Capability::SpeechToText);
        assert_eq!(err.to_string(), "No backend is configured for speech-to-text");
    }

    #[test]
    fn chat_errors_pass_through_transparently() {
        let err = AssistantError::from(ChatError::Configuration("bad model".to_string()));
        assert_eq!(err.to_string(), "Configuration error: bad model");
    }

    #[test]
    fn speech_errors_pass_through_transparently() {
        let err = AssistantError::from(SpeechError::OutputMissing);
        assert!(err.to_string().contains("no output file"));
    }
}
