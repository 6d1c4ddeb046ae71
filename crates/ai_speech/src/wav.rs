//! WAV container encode/decode
//!
//! Backends that transfer audio over HTTP need a canonical container with a
//! header describing rate, bit depth, and channel count; the raw PCM inside
//! an [`AudioBuffer`] carries that metadata only in-process. Only 16-bit PCM
//! is supported, matching what every backend contract requires.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::SpeechError;
use crate::types::AudioBuffer;

/// Encode an [`AudioBuffer`] into WAV container bytes
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>, SpeechError> {
    if buffer.bits_per_sample != 16 {
        return Err(SpeechError::InvalidAudio(format!(
            "Only 16-bit PCM can be encoded, got {} bits per sample",
            buffer.bits_per_sample
        )));
    }
    if buffer.channels == 0 {
        return Err(SpeechError::InvalidAudio(
            "Channel count must be at least 1".to_string(),
        ));
    }
    if buffer.pcm.len() % 2 != 0 {
        return Err(SpeechError::InvalidAudio(
            "16-bit PCM byte length must be even".to_string(),
        ));
    }

    let spec = WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| SpeechError::InvalidAudio(format!("Failed to start WAV writer: {e}")))?;
        for sample in buffer.pcm.chunks_exact(2) {
            let value = i16::from_le_bytes([sample[0], sample[1]]);
            writer
                .write_sample(value)
                .map_err(|e| SpeechError::InvalidAudio(format!("Failed to write sample: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| SpeechError::InvalidAudio(format!("Failed to finalize WAV: {e}")))?;
    }
    Ok(cursor.into_inner())
}

/// Decode WAV container bytes into an [`AudioBuffer`]
pub fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer, SpeechError> {
    let mut reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| SpeechError::InvalidAudio(format!("Failed to parse WAV header: {e}")))?;
    let spec = reader.spec();

    if spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int {
        return Err(SpeechError::InvalidAudio(format!(
            "Only 16-bit integer PCM is supported, got {} bits {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let mut pcm = Vec::with_capacity(reader.len() as usize * 2);
    for sample in reader.samples::<i16>() {
        let value =
            sample.map_err(|e| SpeechError::InvalidAudio(format!("Failed to read sample: {e}")))?;
        pcm.extend_from_slice(&value.to_le_bytes());
    }

    Ok(AudioBuffer::new(
        pcm,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.channels,
    ))
}
