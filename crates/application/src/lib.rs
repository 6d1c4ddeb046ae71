//! Application layer for talkbridge
//!
//! Routes three AI capabilities - chat, speech-to-text, and text-to-speech -
//! between local and remote backends, transparently to the caller:
//!
//! - `settings` resolves the persisted key/value document into an immutable
//!   [`ConfigSnapshot`]; replacing the snapshot is the only way to change
//!   routing behavior
//! - `router` turns a snapshot into a three-valued [`RoutingPlan`], computed
//!   once per configuration change
//! - `session` holds the ordered conversation history and the active persona
//! - `service` composes adapters, supervisor, and session behind the public
//!   surface: `chat`, `recognize`, `synthesize`, `reload`

pub mod error;
pub mod router;
pub mod service;
pub mod session;
pub mod settings;

pub use error::AssistantError;
pub use router::{Capability, Route, RoutingPlan, resolve};
pub use service::{AssistantService, VoiceTurnResult};
pub use session::ConversationSession;
pub use settings::{ConfigSnapshot, SettingsDocument};
