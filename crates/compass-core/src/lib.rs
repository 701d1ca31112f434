//! Compass Core Library
//!
//! Shared functionality for the Compass life-management backend:
//! - Database access and migrations for finance, health, tasks, portfolio,
//!   memory, email, life balance, and learning records
//! - Pure analytics (spending, budgets, cash flow, balance, burnout, wheel of
//!   life, sleep, study patterns, spaced repetition)
//! - Pluggable completion backends (any OpenAI-compatible server, or a mock)
//! - Advisors that pair the analytics with generated narratives

pub mod advisors;
pub mod ai;
pub mod analytics;
pub mod db;
pub mod error;
pub mod models;

/// Test utilities including a mock completion server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisors::{
    EmailAssistant, LearningAdvisor, LifeBalanceAdvisor, Narrative, TextAnalyzer,
};
pub use ai::{
    AIClient, AIConfig, BackendKind, CompletionBackend, CompletionRequest, MockBackend,
    OpenAICompatibleBackend,
};
pub use analytics::{AnalyticsError, Period};
pub use db::{AuditEntry, Database};
pub use error::{Error, Result};
