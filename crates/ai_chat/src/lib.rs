//! AI Chat - Conversational text generation backends
//!
//! Provides one uniform port (`ChatBackend`) over two localities:
//! - `LocalChatBackend` - an Ollama-compatible server on this machine
//! - `OpenRouterBackend` - a cloud chat-completions endpoint
//!
//! Both speak the same OpenAI-compatible wire shape
//! (`{model, messages}` in, `{choices:[{message:{content}}]}` out), so the
//! caller never needs to know which locality served a turn.
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the trait and payload types
//! - `local` / `remote` modules contain the concrete adapters
//!
//! Adapters fail closed: every transport or protocol failure is returned as
//! a typed [`ChatError`], never thrown past the adapter boundary, and they
//! never mutate conversation state - history belongs to the session layer.

pub mod config;
pub mod error;
pub mod local;
pub mod ports;
mod protocol;
pub mod remote;

pub use config::{LocalChatConfig, RemoteChatConfig};
pub use error::ChatError;
pub use local::LocalChatBackend;
pub use ports::{ChatBackend, ChatPayload, WireMessage};
pub use remote::OpenRouterBackend;
