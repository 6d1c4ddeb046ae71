//! Local chat backend
//!
//! Talks to an Ollama-compatible server on this machine over its
//! OpenAI-compatible `/v1/chat/completions` endpoint. The server is expected
//! to be managed by the user (e.g. `ollama serve`); this adapter only issues
//! requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::LocalChatConfig;
use crate::error::ChatError;
use crate::ports::{ChatBackend, ChatPayload};
use crate::protocol::{ChatCompletionRequest, ChatCompletionResponse, error_for_status};

/// Chat backend for a local Ollama-compatible server
#[derive(Debug, Clone)]
pub struct LocalChatBackend {
    client: Client,
    config: LocalChatConfig,
}

impl LocalChatBackend {
    /// Create a new local chat backend
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Configuration` if the configuration is invalid.
    pub fn new(client: Client, config: LocalChatConfig) -> Result<Self, ChatError> {
        config.validate().map_err(ChatError::Configuration)?;
        Ok(Self { client, config })
    }

    /// Completion endpoint URL
    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatBackend for LocalChatBackend {
    #[instrument(skip(self, payload), fields(model = %self.config.model, turns = payload.history.len()))]
    async fn complete(&self, payload: &ChatPayload) -> Result<String, ChatError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: payload.wire_messages(),
        };

        debug!("Requesting completion from local chat server");

        let response = self
            .client
            .post(self.completions_url())
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = error_for_status(response).await;
            warn!(error = %err, "Local chat server rejected the request");
            return Err(err);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        completion.into_reply()
    }

    fn backend_name(&self) -> &'static str {
        "local-chat"
    }
}
