//! Capability router
//!
//! Pure decision logic: given one configuration snapshot, decide per
//! capability whether to use the local backend, the remote backend, or
//! nothing at all. The plan is recomputed on every snapshot change and never
//! cached beyond one snapshot's lifetime; call sites branch on the plan, not
//! on raw configuration fields.

use std::fmt;

use serde::Serialize;

use crate::settings::ConfigSnapshot;

/// An independently-routable capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Capability {
    /// Conversational text generation
    Chat,
    /// Speech-to-text
    SpeechToText,
    /// Text-to-speech
    TextToSpeech,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chat => "chat",
            Self::SpeechToText => "speech-to-text",
            Self::TextToSpeech => "text-to-speech",
        };
        f.write_str(name)
    }
}

/// Where a capability's backend runs, if anywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Subprocess or local HTTP server on this machine
    Local,
    /// Cloud service
    Remote,
    /// No backend is configured for this capability
    Unavailable,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Unavailable => "unavailable",
        };
        f.write_str(name)
    }
}

/// Routing decision for all three capabilities, derived from one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoutingPlan {
    /// Route for conversational text generation
    pub chat: Route,
    /// Route for speech-to-text
    pub stt: Route,
    /// Route for text-to-speech
    pub tts: Route,
}

impl RoutingPlan {
    /// Route for a capability
    #[must_use]
    pub const fn route(&self, capability: Capability) -> Route {
        match capability {
            Capability::Chat => self.chat,
            Capability::SpeechToText => self.stt,
            Capability::TextToSpeech => self.tts,
        }
    }
}

/// Decide the route for every capability from a snapshot.
///
/// Pure function, no side effects. Local speech routes take precedence over
/// remote ones whenever both are fully configured; chat prefers local when a
/// model is configured and either no remote credential exists or the user
/// prioritizes local.
#[must_use]
pub fn resolve(snapshot: &ConfigSnapshot) -> RoutingPlan {
    RoutingPlan {
        chat: resolve_chat(snapshot),
        stt: resolve_stt(snapshot),
        tts: resolve_tts(snapshot),
    }
}

fn resolve_chat(snapshot: &ConfigSnapshot) -> Route {
    let has_model = !snapshot.chat_model.is_empty();
    let has_remote_key = snapshot.openrouter_key.is_some();

    if has_model && (!has_remote_key || snapshot.prioritize_local) {
        Route::Local
    } else if has_remote_key {
        Route::Remote
    } else {
        Route::Unavailable
    }
}

fn resolve_stt(snapshot: &ConfigSnapshot) -> Route {
    let local_ready =
        !snapshot.stt_path.is_empty() && !snapshot.stt_model.is_empty() && snapshot.use_local_stt;
    let remote_ready = snapshot.speech_key.is_some() && !snapshot.speech_region.is_empty();

    if local_ready {
        Route::Local
    } else if remote_ready {
        Route::Remote
    } else {
        Route::Unavailable
    }
}

fn resolve_tts(snapshot: &ConfigSnapshot) -> Route {
    let local_ready =
        !snapshot.tts_path.is_empty() && !snapshot.tts_model.is_empty() && snapshot.use_local_tts;
    let remote_ready = snapshot.speech_key.is_some() && !snapshot.speech_region.is_empty();

    if local_ready {
        Route::Local
    } else if remote_ready {
        Route::Remote
    } else {
        Route::Unavailable
    }
}
