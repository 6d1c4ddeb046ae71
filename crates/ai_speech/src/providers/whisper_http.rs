//! Local speech-to-text over the whisper-server HTTP API
//!
//! The server process itself is owned by the [`ProcessSupervisor`]; this
//! adapter only issues requests against its `/inference` endpoint. Audio is
//! wrapped in a WAV container before upload so the server sees a complete
//! header describing rate, bit depth, and channels.
//!
//! [`ProcessSupervisor`]: crate::supervisor::ProcessSupervisor

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::LocalSttConfig;
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::types::{AudioBuffer, Recognition};
use crate::wav::encode_wav;

/// STT backend for a local whisper-server instance
#[derive(Debug, Clone)]
pub struct WhisperServerBackend {
    client: Client,
    config: LocalSttConfig,
}

/// Response body of the inference endpoint
#[derive(Debug, Deserialize)]
struct InferenceResponse {
    text: String,
}

impl WhisperServerBackend {
    /// Create a new local STT backend
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(client: Client, config: LocalSttConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { client, config })
    }

    /// Inference endpoint URL
    fn inference_url(&self) -> String {
        format!("{}/inference", self.config.base_url())
    }
}

#[async_trait]
impl SpeechToText for WhisperServerBackend {
    #[instrument(skip(self, audio), fields(audio_bytes = audio.size_bytes(), rate = audio.sample_rate))]
    async fn recognize(&self, audio: &AudioBuffer) -> Result<Recognition, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio buffer is empty".to_string()));
        }

        let wav_bytes = encode_wav(audio)?;

        let file_part = Part::bytes(wav_bytes)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| SpeechError::InvalidAudio(format!("Invalid MIME type: {e}")))?;
        let form = Form::new().part("file", file_part);

        debug!("Uploading audio to local recognition server");

        let response = self
            .client
            .post(self.inference_url())
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Local recognition server rejected the request");
            return Err(SpeechError::ServerError {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        let inference: InferenceResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        let text = inference.text.trim().to_string();
        if text.is_empty() {
            Ok(Recognition::NoMatch)
        } else {
            Ok(Recognition::Speech(text))
        }
    }

    fn backend_name(&self) -> &'static str {
        "local-stt"
    }
}
