//! Speech processing errors

use thiserror::Error;

/// Errors that can occur during speech recognition or synthesis
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Invalid backend configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to connect to the speech backend
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the speech backend failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Timeout during processing
    #[error("Speech processing timeout after {0}ms")]
    Timeout(u64),

    /// Backend returned a non-success status
    #[error("Server error (status {status}): {body}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body, truncated to something printable
        body: String,
    },

    /// Invalid audio format or corrupted data
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// Response parsing failed or the expected shape was missing
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The backend canceled the utterance before completing recognition.
    ///
    /// Distinct from a no-match result, which is a success carrying no text.
    #[error("Recognition canceled: {cause}")]
    RecognitionCanceled {
        /// Cancellation cause reported by the backend
        cause: String,
    },

    /// A subprocess exited with a non-zero status
    #[error("Process exited with {status}: {stderr}")]
    ProcessFailed {
        /// Exit status description
        status: String,
        /// Drained stderr content, as diagnostic context
        stderr: String,
    },

    /// A synthesis subprocess exited zero but produced no output file
    #[error("Synthesis process exited cleanly but produced no output file")]
    OutputMissing,

    /// Provider executable not installed or not found
    #[error("Provider not available: {0}")]
    NotAvailable(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(30000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}
