//! Settings document and resolved configuration snapshot
//!
//! The settings document mirrors the persisted key/value store: three
//! sections of plain string/bool/float values, every key optional with a
//! defined default (empty string / false / 1.0). The core only reads it; a
//! configuration-editing surface owns writes.
//!
//! Resolving a document produces an immutable [`ConfigSnapshot`]. Replacing
//! the snapshot via reload is the only way to change routing behavior.

use domain::Persona;
use secrecy::SecretString;
use serde::Deserialize;

/// Raw settings document, one-to-one with the persisted store
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsDocument {
    /// Paths and identifiers for local backends
    pub local_paths: LocalPaths,
    /// Remote backend credentials
    pub api_keys: ApiKeys,
    /// User-facing overrides
    pub user_settings: UserSettings,
}

/// `[local_paths]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalPaths {
    /// Chat model identifier, shared by both chat localities
    pub chat_model: String,
    /// Local recognition server executable
    pub stt_path: String,
    /// Recognition model file
    pub stt_model: String,
    /// Local synthesis executable
    pub tts_path: String,
    /// Synthesis voice model file
    pub tts_model: String,
    /// Synthesis speed scalar
    pub tts_speed: f32,
}

impl Default for LocalPaths {
    fn default() -> Self {
        Self {
            chat_model: String::new(),
            stt_path: String::new(),
            stt_model: String::new(),
            tts_path: String::new(),
            tts_model: String::new(),
            tts_speed: 1.0,
        }
    }
}

/// `[api_keys]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    /// Remote chat bearer credential
    pub openrouter_key: String,
    /// Remote speech subscription credential
    pub azure_speech_key: String,
    /// Remote speech service region
    pub azure_speech_region: String,
}

/// `[user_settings]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Selected persona name
    pub ai_persona: String,
    /// Prefer the local chat backend even when a remote credential exists
    pub prioritize_local: bool,
    /// Route speech-to-text locally when the local paths are configured
    pub use_local_stt: bool,
    /// Route text-to-speech locally when the local paths are configured
    pub use_local_tts: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            ai_persona: Persona::default().name().to_string(),
            prioritize_local: false,
            use_local_stt: false,
            use_local_tts: false,
        }
    }
}

impl SettingsDocument {
    /// Parse a TOML settings document; absent keys take their defaults
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Immutable, fully-resolved configuration state
///
/// Credentials are held as secrets and never appear in `Debug` output or
/// error strings. Created once per load/reload, discarded on the next.
#[derive(Clone)]
pub struct ConfigSnapshot {
    /// Chat model identifier, shared by both chat localities
    pub chat_model: String,
    /// Override for the local chat server base URL (tests, non-standard
    /// ports); the fixed default applies when absent
    pub chat_base_url: Option<String>,
    /// Remote chat credential, absent when not configured
    pub openrouter_key: Option<SecretString>,
    /// Remote speech credential, absent when not configured
    pub speech_key: Option<SecretString>,
    /// Remote speech region
    pub speech_region: String,
    /// Local recognition server executable
    pub stt_path: String,
    /// Recognition model file
    pub stt_model: String,
    /// Local synthesis executable
    pub tts_path: String,
    /// Synthesis voice model file
    pub tts_model: String,
    /// Synthesis speed scalar
    pub tts_speed: f32,
    /// Active persona, resolved with the default fallback
    pub persona: Persona,
    /// Prefer the local chat backend
    pub prioritize_local: bool,
    /// Route speech-to-text locally
    pub use_local_stt: bool,
    /// Route text-to-speech locally
    pub use_local_tts: bool,
}

impl std::fmt::Debug for ConfigSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSnapshot")
            .field("chat_model", &self.chat_model)
            .field("chat_base_url", &self.chat_base_url)
            .field("openrouter_key", &self.openrouter_key.as_ref().map(|_| "[REDACTED]"))
            .field("speech_key", &self.speech_key.as_ref().map(|_| "[REDACTED]"))
            .field("speech_region", &self.speech_region)
            .field("stt_path", &self.stt_path)
            .field("stt_model", &self.stt_model)
            .field("tts_path", &self.tts_path)
            .field("tts_model", &self.tts_model)
            .field("tts_speed", &self.tts_speed)
            .field("persona", &self.persona)
            .field("prioritize_local", &self.prioritize_local)
            .field("use_local_stt", &self.use_local_stt)
            .field("use_local_tts", &self.use_local_tts)
            .finish()
    }
}

impl ConfigSnapshot {
    /// Resolve a settings document into an immutable snapshot
    #[must_use]
    pub fn from_document(doc: &SettingsDocument) -> Self {
        Self {
            chat_model: doc.local_paths.chat_model.trim().to_string(),
            chat_base_url: None,
            openrouter_key: non_empty_secret(&doc.api_keys.openrouter_key),
            speech_key: non_empty_secret(&doc.api_keys.azure_speech_key),
            speech_region: doc.api_keys.azure_speech_region.trim().to_string(),
            stt_path: doc.local_paths.stt_path.trim().to_string(),
            stt_model: doc.local_paths.stt_model.trim().to_string(),
            tts_path: doc.local_paths.tts_path.trim().to_string(),
            tts_model: doc.local_paths.tts_model.trim().to_string(),
            tts_speed: doc.local_paths.tts_speed,
            persona: Persona::from_name(&doc.user_settings.ai_persona),
            prioritize_local: doc.user_settings.prioritize_local,
            use_local_stt: doc.user_settings.use_local_stt,
            use_local_tts: doc.user_settings.use_local_tts,
        }
    }
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self::from_document(&SettingsDocument::default())
    }
}

fn non_empty_secret(value: &str) -> Option<SecretString> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(SecretString::from(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_resolves_to_all_defaults() {
        let doc = SettingsDocument::from_toml("").unwrap();
        let snapshot = ConfigSnapshot::from_document(&doc);

        assert!(snapshot.chat_model.is_empty());
        assert!(snapshot.openrouter_key.is_none());
        assert!(snapshot.speech_key.is_none());
        assert!(snapshot.speech_region.is_empty());
        assert!(snapshot.stt_path.is_empty());
        assert!(!snapshot.prioritize_local);
        assert!(!snapshot.use_local_stt);
        assert!(!snapshot.use_local_tts);
        assert!((snapshot.tts_speed - 1.0).abs() < f32::EPSILON);
        assert_eq!(snapshot.persona, Persona::default());
    }

    #[test]
    fn populated_document_resolves_every_section() {
        let doc = SettingsDocument::from_toml(
            r#"
            [local_paths]
            chat_model = "llama3:8b"
            stt_path = "/opt/whisper-server"
            stt_model = "/models/ggml-base.bin"
            tts_path = "/opt/piper"
            tts_model = "/models/en_US-lessac-medium.onnx"
            tts_speed = 0.85

            [api_keys]
            openrouter_key = "sk-or-123"
            azure_speech_key = "az-456"
            azure_speech_region = "westeurope"

            [user_settings]
            ai_persona = "Exam Coach"
            prioritize_local = true
            use_local_stt = true
            use_local_tts = true
            "#,
        )
        .unwrap();
        let snapshot = ConfigSnapshot::from_document(&doc);

        assert_eq!(snapshot.chat_model, "llama3:8b");
        assert!(snapshot.openrouter_key.is_some());
        assert!(snapshot.speech_key.is_some());
        assert_eq!(snapshot.speech_region, "westeurope");
        assert_eq!(snapshot.stt_path, "/opt/whisper-server");
        assert_eq!(snapshot.persona, Persona::ExamCoach);
        assert!(snapshot.prioritize_local);
        assert!((snapshot.tts_speed - 0.85).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_section_keeps_other_keys_at_defaults() {
        let doc = SettingsDocument::from_toml(
            r#"
            [local_paths]
            chat_model = "llama3:8b"
            "#,
        )
        .unwrap();
        let snapshot = ConfigSnapshot::from_document(&doc);

        assert_eq!(snapshot.chat_model, "llama3:8b");
        assert!(snapshot.stt_path.is_empty());
        assert!((snapshot.tts_speed - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_persona_falls_back_to_default() {
        let doc = SettingsDocument::from_toml(
            r#"
            [user_settings]
            ai_persona = "Space Pirate"
            "#,
        )
        .unwrap();
        let snapshot = ConfigSnapshot::from_document(&doc);
        assert_eq!(snapshot.persona, Persona::default());
    }

    #[test]
    fn whitespace_credentials_resolve_to_absent() {
        let doc = SettingsDocument::from_toml(
            r#"
            [api_keys]
            openrouter_key = "   "
            "#,
        )
        .unwrap();
        let snapshot = ConfigSnapshot::from_document(&doc);
        assert!(snapshot.openrouter_key.is_none());
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let doc = SettingsDocument::from_toml(
            r#"
            [api_keys]
            openrouter_key = "sk-or-secret"
            azure_speech_key = "az-secret"
            "#,
        )
        .unwrap();
        let snapshot = ConfigSnapshot::from_document(&doc);
        let debug = format!("{snapshot:?}");

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-or-secret"));
        assert!(!debug.contains("az-secret"));
    }
}
