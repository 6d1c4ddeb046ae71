//! Remote chat backend
//!
//! Talks to the OpenRouter chat-completions endpoint with a bearer
//! credential. The wire shape is identical to the local backend; only the
//! endpoint, the credential, and two fixed identifying headers differ.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use crate::config::RemoteChatConfig;
use crate::error::ChatError;
use crate::ports::{ChatBackend, ChatPayload};
use crate::protocol::{ChatCompletionRequest, ChatCompletionResponse, error_for_status};

/// Chat backend for the OpenRouter cloud endpoint
#[derive(Debug, Clone)]
pub struct OpenRouterBackend {
    client: Client,
    config: RemoteChatConfig,
}

impl OpenRouterBackend {
    /// Create a new remote chat backend
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Configuration` if the configuration is invalid.
    pub fn new(client: Client, config: RemoteChatConfig) -> Result<Self, ChatError> {
        config.validate().map_err(ChatError::Configuration)?;
        Ok(Self { client, config })
    }

    /// Completion endpoint URL
    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatBackend for OpenRouterBackend {
    #[instrument(skip(self, payload), fields(model = %self.config.model, turns = payload.history.len()))]
    async fn complete(&self, payload: &ChatPayload) -> Result<String, ChatError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: payload.wire_messages(),
        };

        debug!("Requesting completion from cloud chat endpoint");

        let response = self
            .client
            .post(self.completions_url())
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .bearer_auth(self.config.api_key.expose_secret())
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.app_title)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = error_for_status(response).await;
            warn!(error = %err, "Cloud chat endpoint rejected the request");
            return Err(err);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        completion.into_reply()
    }

    fn backend_name(&self) -> &'static str {
        "remote-chat"
    }
}
