//! Types for speech processing
//!
//! `AudioBuffer` carries raw PCM samples with the metadata a backend needs to
//! interpret them. `Recognition` is the result of a speech-to-text call; both
//! of its variants are successes, so "nothing was said" never surfaces as an
//! error.

use serde::{Deserialize, Serialize};

/// Sample rate of audio produced by the local synthesis subprocess
pub const PIPER_SAMPLE_RATE: u32 = 22050;

/// Sample rate of audio produced by the remote synthesis backend
pub const REMOTE_TTS_SAMPLE_RATE: u32 = 24000;

/// Raw PCM audio with the metadata needed to interpret it
///
/// Samples are interleaved little-endian. Both synthesis backends produce
/// 16-bit mono at their fixed sample rate; recognition input is forwarded at
/// whatever rate and channel count the caller declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    /// Interleaved little-endian PCM bytes
    pub pcm: Vec<u8>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Number of channels
    pub channels: u16,
}

impl AudioBuffer {
    /// Create a buffer from raw PCM bytes
    #[must_use]
    pub const fn new(pcm: Vec<u8>, sample_rate: u32, bits_per_sample: u16, channels: u16) -> Self {
        Self {
            pcm,
            sample_rate,
            bits_per_sample,
            channels,
        }
    }

    /// 16-bit mono buffer at the given sample rate (the synthesis contract)
    #[must_use]
    pub const fn mono_16bit(pcm: Vec<u8>, sample_rate: u32) -> Self {
        Self::new(pcm, sample_rate, 16, 1)
    }

    /// Number of PCM bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.pcm.len()
    }

    /// Check if the buffer holds no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pcm.is_empty()
    }

    /// Duration in milliseconds, derived from the sample count
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        let bytes_per_second =
            u64::from(self.sample_rate) * u64::from(self.bits_per_sample / 8) * u64::from(self.channels);
        if bytes_per_second == 0 {
            return 0;
        }
        self.pcm.len() as u64 * 1000 / bytes_per_second
    }
}

/// Outcome of a recognition call
///
/// `NoMatch` means the backend understood the request but found no speech in
/// the audio. It is a success, not an error; cancellation is reported
/// separately as [`SpeechError::RecognitionCanceled`].
///
/// [`SpeechError::RecognitionCanceled`]: crate::SpeechError::RecognitionCanceled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recognition {
    /// Recognized speech; the text may be empty
    Speech(String),
    /// The audio contained no recognizable speech
    NoMatch,
}

impl Recognition {
    /// Transcript text; `NoMatch` yields the empty string
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Speech(text) => text,
            Self::NoMatch => "",
        }
    }

    /// Whether this result carries any usable text
    #[must_use]
    pub fn has_speech(&self) -> bool {
        matches!(self, Self::Speech(text) if !text.trim().is_empty())
    }
}
