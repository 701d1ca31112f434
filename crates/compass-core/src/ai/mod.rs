//! Pluggable completion-service abstraction
//!
//! The rest of the crate treats the language model as an opaque
//! text-in/text-out service: a prompt, an optional system message, a token
//! budget and a temperature go in, free text comes out.
//!
//! # Architecture
//!
//! - `CompletionBackend` trait: the single `complete` operation plus health
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = AIConfig::from_env();
//! if let Some(client) = AIClient::from_config(&config) {
//!     let reply = client
//!         .complete(&CompletionRequest::new("Summarize my week").max_tokens(150))
//!         .await?;
//! }
//! ```

mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;

/// Interface every completion backend implements
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Run one completion and return the reply text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model name (for status output)
    fn model(&self) -> &str;

    /// Host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete completion client
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Any server implementing `/v1/chat/completions`
    OpenAICompatible(OpenAICompatibleBackend),
    /// Canned replies for tests and offline development
    Mock(MockBackend),
}

impl AIClient {
    /// Build a client from configuration
    ///
    /// Returns None for the HTTP backend when no host is configured.
    pub fn from_config(config: &AIConfig) -> Option<Self> {
        match config.backend {
            BackendKind::OpenAICompatible => {
                OpenAICompatibleBackend::from_config(config).map(AIClient::OpenAICompatible)
            }
            BackendKind::Mock => Some(AIClient::Mock(MockBackend::new())),
        }
    }

    /// Shorthand for `from_config(&AIConfig::from_env())`
    pub fn from_env() -> Option<Self> {
        Self::from_config(&AIConfig::from_env())
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

impl From<MockBackend> for AIClient {
    fn from(backend: MockBackend) -> Self {
        AIClient::Mock(backend)
    }
}

#[async_trait]
impl CompletionBackend for AIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.complete(request).await,
            AIClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
