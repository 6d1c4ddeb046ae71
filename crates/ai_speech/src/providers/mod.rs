//! Concrete speech backends (adapters)

pub mod azure;
pub mod piper;
pub mod whisper_http;

pub use azure::AzureSpeechBackend;
pub use piper::PiperBackend;
pub use whisper_http::WhisperServerBackend;
