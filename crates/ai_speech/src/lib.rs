//! AI Speech - Speech-to-Text and Text-to-Speech backends
//!
//! Provides two uniform ports over heterogeneous backends:
//! - `SpeechToText` - one complete audio buffer in, a transcript out
//! - `TextToSpeech` - text in, one complete audio buffer out
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters):
//!   a local whisper-server HTTP adapter, a local piper subprocess adapter,
//!   and a remote cloud adapter covering both capabilities
//! - `supervisor` owns every spawned process: the long-running local
//!   recognition server and the one-shot synthesis subprocesses
//!
//! Every call is request/response over a complete buffer; there is no
//! streaming. A recognition that finds no speech is a success
//! ([`Recognition::NoMatch`]), kept distinct from backend cancellation.

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod supervisor;
pub mod types;
pub mod wav;

pub use config::{LocalSttConfig, LocalTtsConfig, RemoteSpeechConfig};
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::{AzureSpeechBackend, PiperBackend, WhisperServerBackend};
pub use supervisor::{OneShotOutput, ProcessSupervisor, ServerStatus};
pub use types::{AudioBuffer, PIPER_SAMPLE_RATE, REMOTE_TTS_SAMPLE_RATE, Recognition};
