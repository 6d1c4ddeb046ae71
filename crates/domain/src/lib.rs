//! Domain layer for talkbridge
//!
//! Contains the core conversational entities and value objects shared by the
//! capability adapters and the application layer. This layer has no I/O
//! dependencies and defines the ubiquitous language.

pub mod entities;
pub mod value_objects;

pub use entities::{ChatMessage, Conversation, MessageRole};
pub use value_objects::{Persona, PersonaRegistry};
