//! Chat backend errors

use thiserror::Error;

/// Errors that can occur during a chat completion call
#[derive(Debug, Error)]
pub enum ChatError {
    /// Invalid backend configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to connect to the chat backend
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the chat backend failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Timeout during the completion call
    #[error("Chat completion timeout after {0}ms")]
    Timeout(u64),

    /// Backend returned a non-success status
    #[error("Server error (status {status}): {body}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body, truncated to something printable
        body: String,
    },

    /// Response parsing failed or the expected shape was missing
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ChatError {
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
