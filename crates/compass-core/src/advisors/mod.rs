//! Narrative advisors over the completion service
//!
//! Each advisor pairs the deterministic analytics with prose from the
//! completion service. Advisors never fail a request: when no client is
//! configured, or the call errors, a fixed fallback is substituted and the
//! result says so through [`Narrative::Fallback`].
//!
//! [`TextAnalyzer`] is the exception: its replies must parse as JSON, and a
//! bad reply surfaces as [`crate::analytics::AnalyticsError::Upstream`] so the
//! caller decides how to degrade.

mod balance;
mod email;
mod learning;
mod text;

pub use balance::{
    BalanceReport, BurnoutReport, DomainRecommendation, LifeBalanceAdvisor, ScheduleChange,
    ScheduleItem,
};
pub use email::{draft_context, EmailAssistant, EmailInsights};
pub use learning::{
    Assessment, KeyConcept, KnowledgeGap, KnowledgeGapReport, LearningAdvisor, LearningReport,
    RetentionPlan, RetentionTechnique, ReviewQuestion, StudyRecommendation,
};
pub use text::{Sentiment, TextAnalyzer};

use serde::Serialize;
use tracing::warn;

use crate::ai::{AIClient, CompletionBackend, CompletionRequest};
use crate::error::{Error, Result};

/// Reason recorded when no completion client is configured
pub const NOT_CONFIGURED: &str = "Completion service not configured";

/// Generated prose, or the fallback used in its place
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Narrative<T> {
    Generated { content: T },
    Fallback { content: T, reason: String },
}

impl<T> Narrative<T> {
    pub fn generated(content: T) -> Self {
        Self::Generated { content }
    }

    pub fn fallback(content: T, reason: impl Into<String>) -> Self {
        Self::Fallback {
            content,
            reason: reason.into(),
        }
    }

    pub fn content(&self) -> &T {
        match self {
            Self::Generated { content } | Self::Fallback { content, .. } => content,
        }
    }

    pub fn into_content(self) -> T {
        match self {
            Self::Generated { content } | Self::Fallback { content, .. } => content,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Narrative<U> {
        match self {
            Self::Generated { content } => Narrative::Generated { content: f(content) },
            Self::Fallback { content, reason } => Narrative::Fallback {
                content: f(content),
                reason,
            },
        }
    }
}

/// Run one completion, or explain why there is nothing to run it on
async fn complete(client: Option<&AIClient>, request: &CompletionRequest) -> Result<String> {
    let client = client.ok_or_else(|| Error::Completion(NOT_CONFIGURED.to_string()))?;
    client.complete(request).await
}

/// Complete and parse, substituting `fallback` on any failure
///
/// `what` names the narrative in the warning logged on fallback.
async fn narrate<T>(
    client: Option<&AIClient>,
    what: &str,
    request: CompletionRequest,
    parse: impl FnOnce(String) -> Result<T>,
    fallback: impl FnOnce() -> T,
) -> Narrative<T> {
    match complete(client, &request).await.and_then(parse) {
        Ok(content) => Narrative::generated(content),
        Err(e) => {
            if client.is_some() {
                warn!(narrative = what, error = %e, "Completion failed, using fallback");
            }
            Narrative::fallback(fallback(), e.to_string())
        }
    }
}
