//! Configuration for speech backends

use std::path::PathBuf;

use secrecy::SecretString;

/// Configuration for the local recognition server (whisper-server)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSttConfig {
    /// Path to the whisper-server executable
    pub executable_path: PathBuf,
    /// Path to the GGML model file
    pub model_path: PathBuf,
    /// Host the server binds and the adapter connects to
    pub host: String,
    /// Port the server binds and the adapter connects to
    pub port: u16,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl LocalSttConfig {
    /// Config for a server on the default loopback address
    #[must_use]
    pub fn new(executable_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            executable_path: executable_path.into(),
            model_path: model_path.into(),
            host: default_host(),
            port: default_stt_port(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Base URL the HTTP adapter talks to
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("Recognition server executable path is empty".to_string());
        }
        if self.model_path.as_os_str().is_empty() {
            return Err("Recognition model path is empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Configuration for the local synthesis subprocess (piper)
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTtsConfig {
    /// Path to the piper executable
    pub executable_path: PathBuf,
    /// Path to the onnx voice model
    pub model_path: PathBuf,
    /// Speech speed scalar, passed as the length-scale argument
    pub length_scale: f32,
}

impl LocalTtsConfig {
    /// Config with the default speed
    #[must_use]
    pub fn new(executable_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            executable_path: executable_path.into(),
            model_path: model_path.into(),
            length_scale: default_length_scale(),
        }
    }

    /// Override the speed scalar
    #[must_use]
    pub const fn with_length_scale(mut self, length_scale: f32) -> Self {
        self.length_scale = length_scale;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.executable_path.as_os_str().is_empty() {
            return Err("Synthesis executable path is empty".to_string());
        }
        if self.model_path.as_os_str().is_empty() {
            return Err("Synthesis model path is empty".to_string());
        }
        if !self.length_scale.is_finite() || self.length_scale <= 0.0 {
            return Err("Length scale must be a positive number".to_string());
        }
        Ok(())
    }
}

/// Configuration for the remote cloud speech backend
#[derive(Clone)]
pub struct RemoteSpeechConfig {
    /// Subscription credential
    pub api_key: SecretString,
    /// Service region, used to derive the endpoints
    pub region: String,
    /// Recognition language (BCP-47)
    pub language: String,
    /// Synthesis voice name
    pub voice: String,
    /// Override for the recognition endpoint (tests)
    pub stt_endpoint: Option<String>,
    /// Override for the synthesis endpoint (tests)
    pub tts_endpoint: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl std::fmt::Debug for RemoteSpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSpeechConfig")
            .field("api_key", &"[REDACTED]")
            .field("region", &self.region)
            .field("language", &self.language)
            .field("voice", &self.voice)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl RemoteSpeechConfig {
    /// Config with the default language and voice
    #[must_use]
    pub fn new(api_key: SecretString, region: impl Into<String>) -> Self {
        Self {
            api_key,
            region: region.into(),
            language: default_language(),
            voice: default_voice(),
            stt_endpoint: None,
            tts_endpoint: None,
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Override the recognition endpoint (tests, proxies)
    #[must_use]
    pub fn with_stt_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.stt_endpoint = Some(endpoint.into());
        self
    }

    /// Override the synthesis endpoint (tests, proxies)
    #[must_use]
    pub fn with_tts_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.tts_endpoint = Some(endpoint.into());
        self
    }

    /// Recognition endpoint URL
    #[must_use]
    pub fn recognition_url(&self) -> String {
        self.stt_endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1",
                self.region
            )
        })
    }

    /// Synthesis endpoint URL
    #[must_use]
    pub fn synthesis_url(&self) -> String {
        self.tts_endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.region
            )
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.api_key.expose_secret().trim().is_empty() {
            return Err("Speech credential is empty".to_string());
        }
        if self.region.trim().is_empty() {
            return Err("Speech region is empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_stt_port() -> u16 {
    8080
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_voice() -> String {
    "en-US-JennyNeural".to_string()
}

const fn default_length_scale() -> f32 {
    1.0
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}
