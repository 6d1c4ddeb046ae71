//! Port definitions for speech backends
//!
//! One uniform async contract per capability, regardless of where the
//! backend runs. Implementations fail closed: every transport or protocol
//! failure comes back as a typed [`SpeechError`].

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioBuffer, Recognition};

/// Port for speech-to-text backends
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Recognize speech in a complete audio buffer.
    ///
    /// A no-match outcome is a success ([`Recognition::NoMatch`]), not an
    /// error; only transport failures and backend cancellations are errors.
    async fn recognize(&self, audio: &AudioBuffer) -> Result<Recognition, SpeechError>;

    /// Short name of the backend for logs and diagnostics
    fn backend_name(&self) -> &'static str;
}

/// Port for text-to-speech backends
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize a complete text into an audio buffer tagged with the
    /// backend's fixed sample-rate/bit-depth/channel contract
    async fn synthesize(&self, text: &str) -> Result<AudioBuffer, SpeechError>;

    /// Short name of the backend for logs and diagnostics
    fn backend_name(&self) -> &'static str;
}
