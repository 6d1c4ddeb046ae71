//! Remote speech backend (Azure Cognitive Services, REST)
//!
//! One backend implements both capabilities against the region-derived
//! endpoints. Recognition is a single blocking call over the complete
//! utterance: the WAV-wrapped PCM goes up, and the `RecognitionStatus`
//! field discriminates three outcomes - recognized text (possibly empty),
//! no-match (a success carrying no text), and cancellation (an error with
//! the backend's cause). Synthesis posts SSML and receives RIFF bytes at
//! the fixed 24 kHz/16-bit/mono output format.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::RemoteSpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{AudioBuffer, REMOTE_TTS_SAMPLE_RATE, Recognition};
use crate::wav::{decode_wav, encode_wav};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const TTS_OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

/// Remote STT/TTS backend over the cloud speech REST API
#[derive(Debug, Clone)]
pub struct AzureSpeechBackend {
    client: Client,
    config: RemoteSpeechConfig,
}

/// Response body of the single-utterance recognition endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecognitionResponse {
    recognition_status: String,
    #[serde(default)]
    display_text: String,
}

impl AzureSpeechBackend {
    /// Create a new remote speech backend
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(client: Client, config: RemoteSpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { client, config })
    }

    fn api_key(&self) -> &str {
        self.config.api_key.expose_secret()
    }

    /// SSML document for a synthesis request
    fn ssml(&self, text: &str) -> String {
        format!(
            "<speak version='1.0' xml:lang='{lang}'><voice name='{voice}'>{text}</voice></speak>",
            lang = self.config.language,
            voice = self.config.voice,
            text = escape_xml(text),
        )
    }
}

#[async_trait]
impl SpeechToText for AzureSpeechBackend {
    #[instrument(skip(self, audio), fields(audio_bytes = audio.size_bytes(), rate = audio.sample_rate))]
    async fn recognize(&self, audio: &AudioBuffer) -> Result<Recognition, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio buffer is empty".to_string()));
        }

        // The container header declares the caller's rate/bits/channels, so
        // the service consumes the PCM exactly as captured.
        let wav_bytes = encode_wav(audio)?;

        debug!("Sending utterance to remote recognition endpoint");

        let response = self
            .client
            .post(self.config.recognition_url())
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .query(&[("language", self.config.language.as_str()), ("format", "simple")])
            .header(SUBSCRIPTION_KEY_HEADER, self.api_key())
            .header(
                reqwest::header::CONTENT_TYPE,
                format!(
                    "audio/wav; codecs=audio/pcm; samplerate={}",
                    audio.sample_rate
                ),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .body(wav_bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Remote recognition endpoint rejected the request");
            return Err(SpeechError::ServerError {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        let recognition: RecognitionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        match recognition.recognition_status.as_str() {
            "Success" => Ok(Recognition::Speech(recognition.display_text)),
            // Nothing was said; that is a result, not a failure.
            "NoMatch" | "InitialSilenceTimeout" => Ok(Recognition::NoMatch),
            other => Err(SpeechError::RecognitionCanceled {
                cause: other.to_string(),
            }),
        }
    }

    fn backend_name(&self) -> &'static str {
        "remote-stt"
    }
}

#[async_trait]
impl TextToSpeech for AzureSpeechBackend {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice = %self.config.voice))]
    async fn synthesize(&self, text: &str) -> Result<AudioBuffer, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::InvalidAudio(
                "Cannot synthesize empty text".to_string(),
            ));
        }

        debug!("Requesting synthesis from remote speech endpoint");

        let response = self
            .client
            .post(self.config.synthesis_url())
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .header(SUBSCRIPTION_KEY_HEADER, self.api_key())
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", TTS_OUTPUT_FORMAT)
            .body(self.ssml(text))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Remote synthesis endpoint rejected the request");
            return Err(SpeechError::ServerError {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        let riff_bytes = response.bytes().await?;
        if riff_bytes.is_empty() {
            return Err(SpeechError::InvalidResponse(
                "Synthesis response carried no audio".to_string(),
            ));
        }

        let decoded = decode_wav(&riff_bytes)?;
        Ok(AudioBuffer::mono_16bit(decoded.pcm, REMOTE_TTS_SAMPLE_RATE))
    }

    fn backend_name(&self) -> &'static str {
        "remote-tts"
    }
}

/// Escape the five XML-special characters for SSML text content
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
