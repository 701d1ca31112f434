//! Mock backend for testing
//!
//! Returns canned replies chosen by matching the system message (or the
//! prompt when there is none) against configured keys. Useful for unit tests
//! and development without a running completion server.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::CompletionRequest;
use super::CompletionBackend;

const DEFAULT_REPLY: &str = "- Keep a consistent routine\n- Take regular breaks";

#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Every completion fails when set
    pub failing: bool,
    replies: Arc<Vec<(String, String)>>,
    default_reply: String,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Healthy backend with the default reply
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
            replies: Arc::new(Vec::new()),
            default_reply: DEFAULT_REPLY.to_string(),
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Backend whose completions always error
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    /// Reply with `reply` when the system message (or prompt) contains `key`
    ///
    /// Keys are checked in insertion order.
    pub fn with_reply(mut self, key: &str, reply: &str) -> Self {
        Arc::make_mut(&mut self.replies).push((key.to_string(), reply.to_string()));
        self
    }

    pub fn with_default_reply(mut self, reply: &str) -> Self {
        self.default_reply = reply.to_string();
        self
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if self.failing {
            return Err(Error::Completion("Mock backend is failing".into()));
        }

        let haystack = request
            .system_message
            .as_deref()
            .unwrap_or(&request.prompt);
        let reply = self
            .replies
            .iter()
            .find(|(key, _)| haystack.contains(key.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone());
        Ok(reply)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
