//! Email summaries, action items, priority, replies, and drafting

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{narrate, Narrative};
use crate::ai::parsing::{response_lines, strip_bullet};
use crate::ai::{AIClient, CompletionRequest};
use crate::db::now;
use crate::error::{Error, Result};
use crate::models::{Email, Priority};

const MAX_REPLY_SUGGESTIONS: usize = 3;
const REPLY_FALLBACK: &str = "Thank you for your email. I will review and respond soon.";
const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailInsights {
    pub summary: Narrative<String>,
    pub action_items: Narrative<Vec<String>>,
    pub priority: Narrative<Priority>,
    pub reply_suggestions: Narrative<Vec<String>>,
    pub categories: Narrative<Vec<String>>,
    pub analyzed_at: NaiveDateTime,
}

fn subject_and_content(subject: &str, content: &str) -> String {
    format!("Subject: {}\n\nContent: {}", subject, content)
}

/// Reply lines without list numbering
fn suggestion_lines(reply: &str) -> Vec<String> {
    response_lines(reply)
        .into_iter()
        .map(|line| {
            line.trim_start_matches(|c: char| {
                c.is_ascii_digit() || matches!(c, '.' | ')' | '-' | ' ')
            })
            .to_string()
        })
        .filter(|line| !line.is_empty())
        .take(MAX_REPLY_SUGGESTIONS)
        .collect()
}

#[derive(Clone, Default)]
pub struct EmailAssistant {
    client: Option<AIClient>,
}

impl EmailAssistant {
    pub fn new(client: Option<AIClient>) -> Self {
        Self { client }
    }

    /// Every insight for one email, requested one after another
    pub async fn analyze(&self, email: &Email) -> EmailInsights {
        let summary = self.summarize(&email.body).await;
        let action_items = self.action_items(&email.body).await;
        let priority = self.classify_priority(&email.subject, &email.body).await;
        let reply_suggestions = self.reply_suggestions(&email.subject, &email.body).await;
        let categories = self.categorize(&email.subject, &email.body).await;

        EmailInsights {
            summary,
            action_items,
            priority,
            reply_suggestions,
            categories,
            analyzed_at: now(),
        }
    }

    pub async fn summarize(&self, content: &str) -> Narrative<String> {
        narrate(
            self.client.as_ref(),
            "email summary",
            CompletionRequest::new(content)
                .system("Summarize the following email content in a concise way, highlighting key points:")
                .max_tokens(150)
                .temperature(0.7),
            Ok,
            || "Unable to generate summary.".to_string(),
        )
        .await
    }

    pub async fn action_items(&self, content: &str) -> Narrative<Vec<String>> {
        narrate(
            self.client.as_ref(),
            "action items",
            CompletionRequest::new(content)
                .system(
                    "Extract specific action items and tasks from the following email content. \
                     Return them as concise bullet points:",
                )
                .max_tokens(200)
                .temperature(0.5),
            |reply| Ok(response_lines(&reply)),
            Vec::new,
        )
        .await
    }

    /// Unrecognized replies fall back to medium
    pub async fn classify_priority(&self, subject: &str, content: &str) -> Narrative<Priority> {
        narrate(
            self.client.as_ref(),
            "email priority",
            CompletionRequest::new(subject_and_content(subject, content))
                .system(
                    "Classify the priority of this email as 'urgent', 'high', 'medium', or 'low' \
                     based on its content and subject. Consider urgency, importance, and \
                     time-sensitivity.",
                )
                .max_tokens(50)
                .temperature(0.3),
            |reply| {
                let word = reply.trim().trim_matches(|c: char| !c.is_alphanumeric());
                word.parse::<Priority>().map_err(Error::InvalidData)
            },
            || Priority::Medium,
        )
        .await
    }

    pub async fn reply_suggestions(&self, subject: &str, content: &str) -> Narrative<Vec<String>> {
        narrate(
            self.client.as_ref(),
            "reply suggestions",
            CompletionRequest::new(subject_and_content(subject, content))
                .system(
                    "Generate 3 different appropriate reply suggestions for this email. \
                     Make them professional, concise, and contextually relevant:",
                )
                .max_tokens(300)
                .temperature(0.7),
            |reply| Ok(suggestion_lines(&reply)),
            || vec![REPLY_FALLBACK.to_string()],
        )
        .await
    }

    /// Lowercased category tags
    pub async fn categorize(&self, subject: &str, content: &str) -> Narrative<Vec<String>> {
        narrate(
            self.client.as_ref(),
            "email categories",
            CompletionRequest::new(subject_and_content(subject, content))
                .system(
                    "Analyze this email and provide relevant category tags (e.g., 'meeting', \
                     'project', 'request', 'information', etc.). Return only the category names \
                     separated by commas:",
                )
                .max_tokens(100)
                .temperature(0.5),
            |reply| {
                let tags: Vec<String> = reply
                    .split(',')
                    .map(|tag| strip_bullet(tag).to_lowercase())
                    .filter(|tag| !tag.is_empty())
                    .collect();
                if tags.is_empty() {
                    Err(Error::InvalidData("No categories in reply".into()))
                } else {
                    Ok(tags)
                }
            },
            || vec![UNCATEGORIZED.to_string()],
        )
        .await
    }

    /// Draft a document of `kind` ("email", "letter", ...) from key/value context
    pub async fn generate_response(
        &self,
        context: &[(String, String)],
        kind: &str,
    ) -> Narrative<String> {
        let details = context
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Generate a {} based on the following information:\n{}",
            kind, details
        );

        narrate(
            self.client.as_ref(),
            "generated response",
            CompletionRequest::new(prompt)
                .system(format!("You are an AI assistant helping to generate a {}.", kind))
                .max_tokens(1000)
                .temperature(0.7),
            |reply| {
                if reply.is_empty() {
                    Err(Error::InvalidData("Empty reply".into()))
                } else {
                    Ok(reply)
                }
            },
            || format!("Unable to generate a {} at this time.", kind),
        )
        .await
    }
}

/// Key/value context for [`EmailAssistant::generate_response`], blanks dropped
pub fn draft_context(fields: &[(&str, Option<&str>)]) -> Result<Vec<(String, String)>> {
    let context: Vec<(String, String)> = fields
        .iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v.trim().to_string())))
        .filter(|(_, value)| !value.is_empty())
        .collect();
    if context.is_empty() {
        return Err(Error::Validation("Nothing to draft from".into()));
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::models::EmailCategory;
    use chrono::NaiveDate;

    fn email() -> Email {
        Email {
            id: 1,
            subject: "Quarterly report".to_string(),
            body: "Please review the attached report by Friday.".to_string(),
            sender: Some("boss@example.com".to_string()),
            recipients: vec!["me@example.com".to_string()],
            cc: Vec::new(),
            bcc: Vec::new(),
            date: NaiveDate::from_ymd_opt(2024, 4, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            has_attachments: true,
            is_read: false,
            starred: false,
            priority: Priority::Medium,
            category: EmailCategory::Work,
            labels: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_analyze_offline() {
        let insights = EmailAssistant::new(None).analyze(&email()).await;

        assert!(insights.summary.is_fallback());
        assert!(insights.action_items.content().is_empty());
        assert_eq!(*insights.priority.content(), Priority::Medium);
        assert_eq!(insights.reply_suggestions.content(), &vec![REPLY_FALLBACK.to_string()]);
        assert_eq!(insights.categories.content(), &vec![UNCATEGORIZED.to_string()]);
    }

    #[tokio::test]
    async fn test_analyze_generated() {
        let client: AIClient = MockBackend::new()
            .with_reply("Summarize", "Report due Friday.")
            .with_reply("action items", "- Review report\n- Reply to boss")
            .with_reply("Classify the priority", "High.")
            .with_reply(
                "reply suggestions",
                "1. Will do.\n2. On it.\n3. Thanks, reviewing now.\n4. Extra",
            )
            .with_reply("category tags", "Report, Request ")
            .into();

        let insights = EmailAssistant::new(Some(client)).analyze(&email()).await;

        assert_eq!(insights.summary.content(), "Report due Friday.");
        assert_eq!(
            insights.action_items.content(),
            &vec!["Review report".to_string(), "Reply to boss".to_string()]
        );
        assert_eq!(*insights.priority.content(), Priority::High);
        assert!(!insights.priority.is_fallback());
        assert_eq!(
            insights.reply_suggestions.content(),
            &vec![
                "Will do.".to_string(),
                "On it.".to_string(),
                "Thanks, reviewing now.".to_string()
            ]
        );
        assert_eq!(
            insights.categories.content(),
            &vec!["report".to_string(), "request".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unknown_priority_falls_back_to_medium() {
        let client: AIClient = MockBackend::new()
            .with_reply("Classify the priority", "It depends")
            .into();
        let priority = EmailAssistant::new(Some(client))
            .classify_priority("Hi", "Lunch?")
            .await;
        assert!(priority.is_fallback());
        assert_eq!(priority.into_content(), Priority::Medium);
    }

    #[tokio::test]
    async fn test_generate_response() {
        let client: AIClient = MockBackend::new()
            .with_reply("generate a letter", "Dear landlord, ...")
            .into();
        let assistant = EmailAssistant::new(Some(client));
        let context =
            draft_context(&[("recipient", Some("landlord")), ("topic", Some("repairs"))]).unwrap();

        let draft = assistant.generate_response(&context, "letter").await;
        assert_eq!(draft.content(), "Dear landlord, ...");

        let offline = EmailAssistant::new(None).generate_response(&context, "memo").await;
        assert_eq!(offline.content(), "Unable to generate a memo at this time.");
    }

    #[test]
    fn test_draft_context_requires_fields() {
        assert!(draft_context(&[("topic", Some("  ")), ("recipient", None)]).is_err());
        let context = draft_context(&[("topic", Some(" rent "))]).unwrap();
        assert_eq!(context, vec![("topic".to_string(), "rent".to_string())]);
    }
}
