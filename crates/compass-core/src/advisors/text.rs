//! Structured text analysis: sentiment, keywords, summaries

use serde::{Deserialize, Serialize};

use super::complete;
use crate::ai::parsing::{extract_json_array, extract_json_object};
use crate::ai::{AIClient, CompletionRequest};
use crate::analytics::AnalyticsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// -1 (negative) to 1 (positive)
    pub score: f64,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Clone, Default)]
pub struct TextAnalyzer {
    client: Option<AIClient>,
}

impl TextAnalyzer {
    pub fn new(client: Option<AIClient>) -> Self {
        Self { client }
    }

    async fn ask(&self, system: &str, text: &str) -> Result<String, AnalyticsError> {
        let request = CompletionRequest::new(format!("Text to analyze: {}", text))
            .system(system)
            .max_tokens(500)
            .temperature(0.3);
        complete(self.client.as_ref(), &request)
            .await
            .map_err(|e| AnalyticsError::Upstream(e.to_string()))
    }

    pub async fn sentiment(&self, text: &str) -> Result<Sentiment, AnalyticsError> {
        let reply = self
            .ask(
                "Analyze the sentiment of the following text and return a JSON object with \
                 'score' (from -1 to 1) and 'explanation'.",
                text,
            )
            .await?;
        let mut sentiment: Sentiment =
            extract_json_object(&reply).map_err(|e| AnalyticsError::Upstream(e.to_string()))?;
        sentiment.score = sentiment.score.clamp(-1.0, 1.0);
        Ok(sentiment)
    }

    pub async fn keywords(&self, text: &str) -> Result<Vec<String>, AnalyticsError> {
        let reply = self
            .ask(
                "Extract the most important keywords from the following text and return a \
                 JSON array of keywords.",
                text,
            )
            .await?;
        extract_json_array(&reply).map_err(|e| AnalyticsError::Upstream(e.to_string()))
    }

    pub async fn summary(&self, text: &str) -> Result<String, AnalyticsError> {
        let reply = self
            .ask(
                "Summarize the following text in a concise paragraph and return it as a string.",
                text,
            )
            .await?;
        let summary = reply.trim().trim_matches('"').trim();
        if summary.is_empty() {
            return Err(AnalyticsError::Upstream("Empty summary in completion".into()));
        }
        Ok(summary.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;

    fn analyzer(key: &str, reply: &str) -> TextAnalyzer {
        TextAnalyzer::new(Some(MockBackend::new().with_reply(key, reply).into()))
    }

    #[tokio::test]
    async fn test_sentiment_is_clamped() {
        let sentiment = analyzer(
            "sentiment",
            r#"Sure! {"score": 1.7, "explanation": "Very upbeat"}"#,
        )
        .sentiment("Best day ever")
        .await
        .unwrap();
        assert_eq!(sentiment.score, 1.0);
        assert_eq!(sentiment.explanation, "Very upbeat");
    }

    #[tokio::test]
    async fn test_keywords() {
        let keywords = analyzer("keywords", r#"["budget", "rent"]"#)
            .keywords("My rent ate the budget")
            .await
            .unwrap();
        assert_eq!(keywords, vec!["budget", "rent"]);
    }

    #[tokio::test]
    async fn test_unusable_reply_is_upstream_error() {
        let err = analyzer("sentiment", "I feel fine")
            .sentiment("ok")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::Upstream(_)));

        let err = analyzer("Summarize", "  \"\"  ").summary("ok").await.unwrap_err();
        assert!(matches!(err, AnalyticsError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_not_configured() {
        let err = TextAnalyzer::new(None).summary("hello").await.unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::Upstream(
                "Completion service error: Completion service not configured".into()
            )
        );
    }
}
