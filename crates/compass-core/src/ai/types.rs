//! Completion request and client configuration types
//!
//! These types are backend-agnostic and shared by every backend.

use serde::{Deserialize, Serialize};

/// Default model when `OPENAI_COMPATIBLE_MODEL` is unset
pub const DEFAULT_MODEL: &str = "gpt-4";
/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// One text-in/text-out completion call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// User prompt
    pub prompt: String,
    /// Optional system message steering the reply
    pub system_message: Option<String>,
    pub max_tokens: u32,
    /// 0-1, lower is more deterministic
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_message: None,
            max_tokens: 300,
            temperature: 0.7,
        }
    }

    pub fn system(mut self, message: impl Into<String>) -> Self {
        self.system_message = Some(message.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Which backend `AIClient::from_config` builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    OpenAICompatible,
    Mock,
}

impl BackendKind {
    /// Parse `AI_BACKEND`; unknown names fall back to the HTTP backend
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "mock" => Self::Mock,
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                Self::OpenAICompatible
            }
            other => {
                tracing::warn!(backend = %other, "Unknown AI_BACKEND, using openai_compatible");
                Self::OpenAICompatible
            }
        }
    }
}

/// Completion client configuration, passed explicitly to whoever needs a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AIConfig {
    pub backend: BackendKind,
    /// Server base URL; required for the HTTP backend
    pub host: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            host: None,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AIConfig {
    /// Read configuration from environment variables
    ///
    /// - `AI_BACKEND`: openai_compatible (default) or mock
    /// - `OPENAI_COMPATIBLE_HOST`: server URL
    /// - `OPENAI_COMPATIBLE_MODEL`: model name (default: gpt-4)
    /// - `OPENAI_COMPATIBLE_API_KEY`: bearer token (optional)
    /// - `AI_TIMEOUT_SECS`: request timeout (default: 60)
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            backend: non_empty("AI_BACKEND")
                .map(|b| BackendKind::parse(&b))
                .unwrap_or_default(),
            host: non_empty("OPENAI_COMPATIBLE_HOST"),
            model: non_empty("OPENAI_COMPATIBLE_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: non_empty("OPENAI_COMPATIBLE_API_KEY"),
            timeout_secs: non_empty("AI_TIMEOUT_SECS")
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn mock() -> Self {
        Self {
            backend: BackendKind::Mock,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("hello")
            .system("be brief")
            .max_tokens(150)
            .temperature(0.3);
        assert_eq!(request.system_message.as_deref(), Some("be brief"));
        assert_eq!(request.max_tokens, 150);
        assert_eq!(request.temperature, 0.3);
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(BackendKind::parse("MOCK"), BackendKind::Mock);
        assert_eq!(BackendKind::parse("vllm"), BackendKind::OpenAICompatible);
        assert_eq!(BackendKind::parse("nonsense"), BackendKind::OpenAICompatible);
    }

    #[test]
    fn test_default_config() {
        let config = AIConfig::default();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.timeout_secs, 60);
        assert!(config.host.is_none());
    }
}
