//! Configuration for chat backends

use secrecy::SecretString;

/// Configuration for the local Ollama-compatible backend
#[derive(Debug, Clone)]
pub struct LocalChatConfig {
    /// Base URL of the local server
    pub base_url: String,
    /// Model identifier to request
    pub model: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl LocalChatConfig {
    /// Config for a model served on the default local port
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: default_local_base_url(),
            model: model.into(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Override the base URL (tests, non-standard ports)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Chat model identifier is empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Configuration for the remote OpenRouter backend
#[derive(Clone)]
pub struct RemoteChatConfig {
    /// Base URL of the cloud endpoint
    pub base_url: String,
    /// Model identifier to request
    pub model: String,
    /// Bearer credential
    pub api_key: SecretString,
    /// Fixed identifying header: where the traffic originates
    pub referer: String,
    /// Fixed identifying header: application title
    pub app_title: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl std::fmt::Debug for RemoteChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteChatConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl RemoteChatConfig {
    /// Config for the default cloud endpoint
    #[must_use]
    pub fn new(model: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            base_url: default_remote_base_url(),
            model: model.into(),
            api_key,
            referer: default_referer(),
            app_title: default_app_title(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Override the base URL (tests, proxies)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.model.trim().is_empty() {
            return Err("Chat model identifier is empty".to_string());
        }
        if self.api_key.expose_secret().trim().is_empty() {
            return Err("Remote chat credential is empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_local_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_remote_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_referer() -> String {
    "http://localhost".to_string()
}

fn default_app_title() -> String {
    "talkbridge".to_string()
}

const fn default_timeout_ms() -> u64 {
    60000 // 60 seconds
}
