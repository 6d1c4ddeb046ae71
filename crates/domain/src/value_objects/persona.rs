//! Persona value object
//!
//! A persona is a named system prompt that frames the assistant's behavior.
//! The set of personas is closed; the prompt text is opaque configuration
//! and can be replaced at runtime without touching persona identity.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Named assistant persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Friendly conversational tutor for beginners
    #[default]
    EnglishTutor,
    /// Structured exam-preparation coach
    ExamCoach,
}

impl Persona {
    /// Resolve a persona from its configured name.
    ///
    /// Unknown names fall back to the default persona so the active persona
    /// always resolves to a known prompt.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::all()
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    /// Human-readable persona name, as used in the settings document
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EnglishTutor => "English Tutor",
            Self::ExamCoach => "Exam Coach",
        }
    }

    /// All selectable personas
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::EnglishTutor, Self::ExamCoach]
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry mapping every persona to its system prompt.
///
/// Total by construction: the built-in prompts cover every variant, and
/// overrides replace text without removing entries.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    prompts: HashMap<Persona, String>,
}

impl PersonaRegistry {
    /// Registry with the built-in prompt for every persona
    #[must_use]
    pub fn new() -> Self {
        let mut prompts = HashMap::new();
        prompts.insert(
            Persona::EnglishTutor,
            "You are Jenny, a friendly and patient English tutor. Use simple \
             words and short sentences, gently correct mistakes, and end every \
             reply with an encouraging open question."
                .to_string(),
        );
        prompts.insert(
            Persona::ExamCoach,
            "You are Jenny, a structured speaking-exam coach. Offer practice \
             in speaking, vocabulary, or listening, evaluate answers against \
             the official criteria, and always return to the practice menu."
                .to_string(),
        );
        Self { prompts }
    }

    /// Replace the prompt text for a persona
    pub fn set_prompt(&mut self, persona: Persona, prompt: impl Into<String>) {
        self.prompts.insert(persona, prompt.into());
    }

    /// Prompt text for a persona; the registry is total, so this never fails
    #[must_use]
    pub fn prompt(&self, persona: Persona) -> &str {
        self.prompts
            .get(&persona)
            .map_or("You are a helpful assistant.", String::as_str)
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
