//! Assistant service facade
//!
//! Composes the router, the adapters, the process supervisor, and the
//! conversation session behind the public capability surface: `chat`,
//! `recognize`, `synthesize`, and `reload`. Backend state is swapped
//! atomically on reload; the supervisor and the HTTP client are the only
//! process-wide resources and both are owned here.
//!
//! Caller obligations (not enforced by the core): turns are serialized, and
//! within one voice turn recognition completes before chat is issued, chat
//! before synthesis. Abandoning an in-flight call is safe; history is only
//! mutated from a completed, successful call.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{info, instrument, warn};

use ai_chat::{
    ChatBackend, LocalChatBackend, LocalChatConfig, OpenRouterBackend, RemoteChatConfig,
};
use ai_speech::{
    AudioBuffer, AzureSpeechBackend, LocalSttConfig, LocalTtsConfig, PiperBackend,
    ProcessSupervisor, Recognition, RemoteSpeechConfig, SpeechToText, TextToSpeech,
    WhisperServerBackend,
};
use domain::Persona;

use crate::error::AssistantError;
use crate::router::{Capability, Route, RoutingPlan, resolve};
use crate::session::ConversationSession;
use crate::settings::ConfigSnapshot;

/// Model requested from the remote chat endpoint when none is configured
const DEFAULT_REMOTE_CHAT_MODEL: &str = "openrouter/auto";

/// Result of one complete voice turn (recognize, chat, synthesize)
#[derive(Debug)]
pub struct VoiceTurnResult {
    /// What the user said; empty when nothing was recognized
    pub transcript: String,
    /// Assistant reply, absent when the turn short-circuited on no speech
    pub reply: Option<String>,
    /// Synthesized reply audio, absent when synthesis is unrouted or failed
    pub reply_audio: Option<AudioBuffer>,
}

/// Everything derived from one configuration snapshot
struct RuntimeState {
    snapshot: ConfigSnapshot,
    plan: RoutingPlan,
    chat: Option<Arc<dyn ChatBackend>>,
    stt: Option<Arc<dyn SpeechToText>>,
    tts: Option<Arc<dyn TextToSpeech>>,
    /// Present when the plan routes STT locally; the supervisor needs it to
    /// start the recognition server
    local_stt: Option<LocalSttConfig>,
}

impl RuntimeState {
    fn build(
        client: &reqwest::Client,
        supervisor: &Arc<ProcessSupervisor>,
        snapshot: ConfigSnapshot,
    ) -> Result<Self, AssistantError> {
        let plan = resolve(&snapshot);

        let chat: Option<Arc<dyn ChatBackend>> = match plan.chat {
            Route::Local => {
                let mut config = LocalChatConfig::new(&snapshot.chat_model);
                if let Some(base_url) = &snapshot.chat_base_url {
                    config = config.with_base_url(base_url);
                }
                Some(Arc::new(
                    LocalChatBackend::new(client.clone(), config)
                        .map_err(|e| AssistantError::Configuration(e.to_string()))?,
                ))
            },
            Route::Remote => {
                let key = snapshot
                    .openrouter_key
                    .clone()
                    .ok_or_else(|| AssistantError::Configuration("missing chat credential".to_string()))?;
                let model = if snapshot.chat_model.is_empty() {
                    DEFAULT_REMOTE_CHAT_MODEL
                } else {
                    &snapshot.chat_model
                };
                let config = RemoteChatConfig::new(model, key);
                Some(Arc::new(
                    OpenRouterBackend::new(client.clone(), config)
                        .map_err(|e| AssistantError::Configuration(e.to_string()))?,
                ))
            },
            Route::Unavailable => None,
        };

        let remote_speech = |snapshot: &ConfigSnapshot| -> Result<AzureSpeechBackend, AssistantError> {
            let key = snapshot
                .speech_key
                .clone()
                .ok_or_else(|| AssistantError::Configuration("missing speech credential".to_string()))?;
            let config = RemoteSpeechConfig::new(key, snapshot.speech_region.clone());
            AzureSpeechBackend::new(client.clone(), config)
                .map_err(|e| AssistantError::Configuration(e.to_string()))
        };

        let mut local_stt = None;
        let stt: Option<Arc<dyn SpeechToText>> = match plan.stt {
            Route::Local => {
                let config = LocalSttConfig::new(&snapshot.stt_path, &snapshot.stt_model);
                local_stt = Some(config.clone());
                Some(Arc::new(
                    WhisperServerBackend::new(client.clone(), config)
                        .map_err(|e| AssistantError::Configuration(e.to_string()))?,
                ))
            },
            Route::Remote => Some(Arc::new(remote_speech(&snapshot)?)),
            Route::Unavailable => None,
        };

        let tts: Option<Arc<dyn TextToSpeech>> = match plan.tts {
            Route::Local => {
                let config = LocalTtsConfig::new(&snapshot.tts_path, &snapshot.tts_model)
                    .with_length_scale(snapshot.tts_speed);
                Some(Arc::new(
                    PiperBackend::new(Arc::clone(supervisor), config)
                        .map_err(|e| AssistantError::Configuration(e.to_string()))?,
                ))
            },
            Route::Remote => Some(Arc::new(remote_speech(&snapshot)?)),
            Route::Unavailable => None,
        };

        Ok(Self {
            snapshot,
            plan,
            chat,
            stt,
            tts,
            local_stt,
        })
    }
}

/// Facade over capability routing, adapters, supervision, and session state
pub struct AssistantService {
    state: ArcSwap<RuntimeState>,
    supervisor: Arc<ProcessSupervisor>,
    session: Mutex<ConversationSession>,
    client: reqwest::Client,
}

impl fmt::Debug for AssistantService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantService")
            .field("plan", &self.state.load().plan)
            .finish_non_exhaustive()
    }
}

impl AssistantService {
    /// Build the service from a resolved snapshot and start the local
    /// recognition server when the plan routes STT locally
    pub async fn new(snapshot: ConfigSnapshot) -> Result<Self, AssistantError> {
        let client = reqwest::Client::new();
        let supervisor = Arc::new(ProcessSupervisor::new());
        let state = RuntimeState::build(&client, &supervisor, snapshot)?;

        let persona = state.snapshot.persona;
        let service = Self {
            state: ArcSwap::new(Arc::new(state)),
            supervisor,
            session: Mutex::new(ConversationSession::new(persona)),
            client,
        };
        service.start_local_stt_if_routed().await;
        Ok(service)
    }

    /// Replace the configuration snapshot.
    ///
    /// Stops any running local recognition server first; an old instance is
    /// not trusted to match the new configuration. Clears the conversation
    /// history and re-resolves the persona.
    #[instrument(skip(self, snapshot))]
    pub async fn reload(&self, snapshot: ConfigSnapshot) -> Result<(), AssistantError> {
        self.supervisor.stop().await;

        let state = RuntimeState::build(&self.client, &self.supervisor, snapshot)?;
        let persona = state.snapshot.persona;
        let plan = state.plan;
        self.state.store(Arc::new(state));

        {
            let mut session = self.session.lock();
            session.reset();
            session.set_persona(persona);
        }

        info!(chat = %plan.chat, stt = %plan.stt, tts = %plan.tts, "Configuration reloaded");
        self.start_local_stt_if_routed().await;
        Ok(())
    }

    /// Run one chat turn over the accumulated history.
    ///
    /// The user turn is recorded before the backend call and kept even when
    /// the call fails; the assistant turn is recorded only on success.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn chat(&self, text: &str) -> Result<String, AssistantError> {
        let state = self.state.load_full();
        let backend = state
            .chat
            .clone()
            .ok_or(AssistantError::Unavailable(Capability::Chat))?;

        let payload = {
            let mut session = self.session.lock();
            session.append_user_turn(text);
            session.build_payload()
        };

        match backend.complete(&payload).await {
            Ok(reply) => {
                self.session
                    .lock()
                    .append_assistant_turn_if_success(reply.clone(), false);
                Ok(reply)
            },
            Err(e) => {
                warn!(backend = backend.backend_name(), error = %e, "Chat turn failed");
                Err(e.into())
            },
        }
    }

    /// Recognize speech in a complete audio buffer
    #[instrument(skip(self, audio), fields(audio_bytes = audio.size_bytes()))]
    pub async fn recognize(&self, audio: &AudioBuffer) -> Result<Recognition, AssistantError> {
        let state = self.state.load_full();
        let backend = state
            .stt
            .clone()
            .ok_or(AssistantError::Unavailable(Capability::SpeechToText))?;

        // The local server may have been stopped or died; make sure it is
        // up before the HTTP call.
        if let Some(config) = &state.local_stt {
            self.supervisor.ensure_started(config).await?;
        }

        Ok(backend.recognize(audio).await?)
    }

    /// Synthesize text into a complete audio buffer
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn synthesize(&self, text: &str) -> Result<AudioBuffer, AssistantError> {
        let state = self.state.load_full();
        let backend = state
            .tts
            .clone()
            .ok_or(AssistantError::Unavailable(Capability::TextToSpeech))?;

        Ok(backend.synthesize(text).await?)
    }

    /// Run one complete voice turn: recognize, then chat, then synthesize.
    ///
    /// Short-circuits with an empty result when the audio contains no
    /// speech. Synthesis failure degrades to a text-only reply rather than
    /// failing the turn.
    #[instrument(skip(self, audio), fields(audio_bytes = audio.size_bytes()))]
    pub async fn process_voice_turn(
        &self,
        audio: &AudioBuffer,
    ) -> Result<VoiceTurnResult, AssistantError> {
        let recognition = self.recognize(audio).await?;
        if !recognition.has_speech() {
            info!("No speech recognized, skipping chat and synthesis");
            return Ok(VoiceTurnResult {
                transcript: recognition.text().to_string(),
                reply: None,
                reply_audio: None,
            });
        }
        let transcript = recognition.text().to_string();

        let reply = self.chat(&transcript).await?;

        let reply_audio = if self.state.load().plan.tts == Route::Unavailable {
            None
        } else {
            match self.synthesize(&reply).await {
                Ok(audio) => Some(audio),
                Err(e) => {
                    warn!(error = %e, "Synthesis failed, falling back to text only");
                    None
                },
            }
        };

        Ok(VoiceTurnResult {
            transcript,
            reply: Some(reply),
            reply_audio,
        })
    }

    /// Current routing plan, for display
    #[must_use]
    pub fn routing(&self) -> RoutingPlan {
        self.state.load().plan
    }

    /// Names of all selectable personas
    #[must_use]
    pub fn persona_names(&self) -> Vec<&'static str> {
        Persona::all().into_iter().map(|p| p.name()).collect()
    }

    /// Switch the active persona by name, with the unknown-name fallback.
    ///
    /// Past turns keep their framing; only future calls change.
    pub fn set_persona(&self, name: &str) -> Persona {
        let persona = Persona::from_name(name);
        self.session.lock().set_persona(persona);
        persona
    }

    /// Active persona
    #[must_use]
    pub fn persona(&self) -> Persona {
        self.session.lock().persona()
    }

    /// Number of stored conversation turns
    #[must_use]
    pub fn turn_count(&self) -> usize {
        self.session.lock().turn_count()
    }

    /// Clear the conversation history
    pub fn reset_conversation(&self) {
        self.session.lock().reset();
    }

    /// Stop every supervised process. Must be called on shutdown; an
    /// orphaned recognition server outlives the application otherwise.
    pub async fn shutdown(&self) {
        self.supervisor.stop().await;
    }

    async fn start_local_stt_if_routed(&self) {
        let state = self.state.load_full();
        if let Some(config) = &state.local_stt {
            if let Err(e) = self.supervisor.ensure_started(config).await {
                warn!(error = %e, "Could not start local recognition server");
            }
        }
    }
}
