//! Local text-to-speech via the piper subprocess
//!
//! Piper is invoked once per request through the supervisor's one-shot pipe
//! protocol: the text goes in on stdin, the synthesized WAV comes out at a
//! temporary file path passed as an argument. Exit code and output-file
//! existence are the success signals; stderr is diagnostic context only.

use std::ffi::OsStr;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::Builder;
use tracing::{debug, instrument, warn};

use crate::config::LocalTtsConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::supervisor::ProcessSupervisor;
use crate::types::{AudioBuffer, PIPER_SAMPLE_RATE};
use crate::wav::decode_wav;

/// TTS backend driving a local piper executable
#[derive(Debug, Clone)]
pub struct PiperBackend {
    supervisor: Arc<ProcessSupervisor>,
    config: LocalTtsConfig,
}

impl PiperBackend {
    /// Create a new local TTS backend
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(
        supervisor: Arc<ProcessSupervisor>,
        config: LocalTtsConfig,
    ) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { supervisor, config })
    }
}

#[async_trait]
impl TextToSpeech for PiperBackend {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<AudioBuffer, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::InvalidAudio(
                "Cannot synthesize empty text".to_string(),
            ));
        }

        let output_file = Builder::new()
            .suffix(".wav")
            .tempfile()
            .map_err(|e| SpeechError::ProcessFailed {
                status: "temp file creation failed".to_string(),
                stderr: e.to_string(),
            })?;

        let length_scale = self.config.length_scale.to_string();
        let args = [
            OsStr::new("--model"),
            self.config.model_path.as_os_str(),
            OsStr::new("--input-file"),
            OsStr::new("-"),
            OsStr::new("--length-scale"),
            OsStr::new(&length_scale),
            OsStr::new("--output_file"),
            output_file.path().as_os_str(),
        ];

        debug!("Invoking piper subprocess");

        let output = self
            .supervisor
            .run_one_shot(&self.config.executable_path, args, text)
            .await?;

        if !output.status.success() {
            warn!(status = %output.status, "Piper subprocess failed");
            return Err(SpeechError::ProcessFailed {
                status: output.status.to_string(),
                stderr: output.stderr.trim().to_string(),
            });
        }

        let wav_bytes = match tokio::fs::read(output_file.path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Piper exited cleanly but the output file is gone");
                return Err(SpeechError::OutputMissing);
            },
            Err(e) => {
                return Err(SpeechError::ProcessFailed {
                    status: "output read failed".to_string(),
                    stderr: e.to_string(),
                });
            },
        };

        if wav_bytes.is_empty() {
            warn!("Piper exited cleanly but wrote no audio");
            return Err(SpeechError::OutputMissing);
        }

        let decoded = decode_wav(&wav_bytes)?;
        // The temp file drops here; the buffer is tagged with piper's fixed
        // output contract regardless of what the header happened to claim.
        Ok(AudioBuffer::mono_16bit(decoded.pcm, PIPER_SAMPLE_RATE))
    }

    fn backend_name(&self) -> &'static str {
        "local-tts"
    }
}
