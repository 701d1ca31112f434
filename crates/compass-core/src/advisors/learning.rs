//! Study coaching: learning patterns, retention plans, knowledge gaps

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{narrate, Narrative};
use crate::ai::parsing::{extract_json_array, response_lines};
use crate::ai::{AIClient, CompletionRequest};
use crate::analytics::learning::{
    learning_style_scores, performance_metrics, primary_style, LearningStyleScores,
    PerformanceMetrics,
};
use crate::analytics::spaced_repetition::{review_schedule, ReviewSession};
use crate::db::now;
use crate::models::StudySession;

/// Sessions included in prompts, most recent last
const RECENT_SESSIONS: usize = 5;
/// Characters of study material sent for concept extraction
const CONTENT_LIMIT: usize = 1000;
/// Assessment scores below this mark a gap
const GAP_THRESHOLD: f64 = 0.7;
/// Gaps scoring below this are severe
const SEVERE_GAP: f64 = 0.5;

const INSIGHTS_FALLBACK: &str = "Unable to generate learning insights at this time.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyRecommendation {
    pub recommendation: String,
    pub style_alignment: String,
    /// The first recommendation is "high", the rest "medium"
    pub priority: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningReport {
    pub learning_style: LearningStyleScores,
    pub primary_style: Option<String>,
    pub performance_metrics: PerformanceMetrics,
    pub insights: Narrative<Vec<String>>,
    pub recommendations: Narrative<Vec<StudyRecommendation>>,
    pub analyzed_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyConcept {
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub importance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewQuestion {
    pub concept: String,
    pub question: String,
    /// "multiple_choice" or "open_ended"
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

fn default_question_type() -> String {
    "open_ended".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionTechnique {
    pub technique: String,
    pub difficulty: &'static str,
    pub effectiveness: &'static str,
    pub time_required_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionPlan {
    pub topic: String,
    pub key_concepts: Narrative<Vec<KeyConcept>>,
    pub review_questions: Narrative<Vec<ReviewQuestion>>,
    pub review_schedule: Vec<ReviewSession>,
    pub retention_techniques: Narrative<Vec<RetentionTechnique>>,
    pub generated_at: NaiveDateTime,
}

/// One assessed subtopic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default)]
    pub subtopic: Option<String>,
    /// 0-1
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeGap {
    pub subtopic: String,
    pub score: f64,
    /// "high" below 0.5, otherwise "medium"
    pub severity: &'static str,
    pub concepts: Narrative<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeGapReport {
    pub topic: String,
    pub identified_gaps: Vec<KnowledgeGap>,
    pub learning_plan: Narrative<Vec<String>>,
    pub analyzed_at: NaiveDateTime,
}

fn recent(sessions: &[StudySession]) -> &[StudySession] {
    &sessions[sessions.len().saturating_sub(RECENT_SESSIONS)..]
}

#[derive(Clone, Default)]
pub struct LearningAdvisor {
    client: Option<AIClient>,
}

impl LearningAdvisor {
    pub fn new(client: Option<AIClient>) -> Self {
        Self { client }
    }

    /// Style, performance and coaching for chronologically ordered sessions
    pub async fn analyze_learning_patterns(&self, sessions: &[StudySession]) -> LearningReport {
        let styles = learning_style_scores(sessions);
        let metrics = performance_metrics(sessions);
        let primary = primary_style(&styles).map(str::to_string);

        let insights = self.insights(sessions, &styles).await;
        let recommendations = match primary.as_deref() {
            Some(style) => self.recommendations(style, &metrics).await,
            None => Narrative::fallback(Vec::new(), "No learning style detected yet"),
        };

        LearningReport {
            learning_style: styles,
            primary_style: primary,
            performance_metrics: metrics,
            insights,
            recommendations,
            analyzed_at: now(),
        }
    }

    async fn insights(
        &self,
        sessions: &[StudySession],
        styles: &LearningStyleScores,
    ) -> Narrative<Vec<String>> {
        let style_text = styles
            .iter()
            .map(|(style, score)| format!("{}: {:.2}", style, score))
            .collect::<Vec<_>>()
            .join("\n");
        let sessions_text = recent(sessions)
            .iter()
            .map(|s| {
                format!(
                    "Topic: {}, Type: {}, Performance: {:.2}",
                    s.topic.as_deref().unwrap_or("unknown"),
                    s.session_type,
                    s.performance.unwrap_or(0.0)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Analyze the following learning data and provide key insights:\n\n\
             Learning Style Preferences:\n{}\n\n\
             Recent Study Sessions:\n{}\n\n\
             Provide 3-5 specific insights about learning patterns and effectiveness.\n\
             Focus on strengths, areas for improvement, and notable patterns.",
            style_text, sessions_text
        );

        narrate(
            self.client.as_ref(),
            "learning insights",
            CompletionRequest::new(prompt)
                .system("You are an AI learning coach analyzing study patterns.")
                .max_tokens(300)
                .temperature(0.7),
            |reply| Ok(response_lines(&reply)),
            || vec![INSIGHTS_FALLBACK.to_string()],
        )
        .await
    }

    async fn recommendations(
        &self,
        style: &str,
        metrics: &PerformanceMetrics,
    ) -> Narrative<Vec<StudyRecommendation>> {
        let prompt = format!(
            "Generate specific study recommendations based on:\n\n\
             Learning Style: {}\n\
             Average Performance: {:.2}\n\
             Areas Needing Improvement: {}\n\n\
             Provide 3 specific, actionable recommendations that:\n\
             1. Align with the learning style\n\
             2. Address improvement areas\n\
             3. Include specific techniques or methods",
            style,
            metrics.average_performance,
            metrics.needs_improvement.join(", ")
        );

        narrate(
            self.client.as_ref(),
            "study recommendations",
            CompletionRequest::new(prompt)
                .system("You are an AI learning coach providing personalized study recommendations.")
                .max_tokens(400)
                .temperature(0.7),
            |reply| {
                Ok(response_lines(&reply)
                    .into_iter()
                    .enumerate()
                    .map(|(i, recommendation)| StudyRecommendation {
                        recommendation,
                        style_alignment: style.to_string(),
                        priority: if i == 0 { "high" } else { "medium" },
                    })
                    .collect())
            },
            Vec::new,
        )
        .await
    }

    /// Concepts, review questions, a spaced review schedule, and techniques
    pub async fn optimize_retention(&self, topic: &str, content: &str) -> RetentionPlan {
        let key_concepts = self.key_concepts(topic, content).await;
        let concepts = key_concepts.content();

        let review_questions = if concepts.is_empty() {
            Narrative::fallback(Vec::new(), "No key concepts to build questions from")
        } else {
            self.review_questions(topic, concepts).await
        };
        let retention_techniques = self.retention_techniques(topic, concepts).await;

        RetentionPlan {
            topic: topic.to_string(),
            review_schedule: review_schedule(concepts.len() as u32, now()),
            key_concepts,
            review_questions,
            retention_techniques,
            generated_at: now(),
        }
    }

    async fn key_concepts(&self, topic: &str, content: &str) -> Narrative<Vec<KeyConcept>> {
        let excerpt: String = content.chars().take(CONTENT_LIMIT).collect();
        let prompt = format!(
            "Extract key concepts from the following {} content.\n\
             Return a JSON array of objects with \"title\", \"explanation\" and \"importance\".\n\n\
             Content:\n{}",
            topic, excerpt
        );

        narrate(
            self.client.as_ref(),
            "key concepts",
            CompletionRequest::new(prompt)
                .system("You are an AI extracting and structuring key learning concepts.")
                .max_tokens(500)
                .temperature(0.5),
            |reply| extract_json_array(&reply),
            Vec::new,
        )
        .await
    }

    async fn review_questions(
        &self,
        topic: &str,
        concepts: &[KeyConcept],
    ) -> Narrative<Vec<ReviewQuestion>> {
        let concepts_text = concepts
            .iter()
            .map(|c| format!("- {}: {}", c.title, c.explanation))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Generate 2 review questions for each of the following concepts in {}:\n{}\n\n\
             For each concept create one multiple-choice and one open-ended question.\n\
             Return a JSON array of objects with \"concept\", \"question\", \"type\" \
             (\"multiple_choice\" or \"open_ended\"), \"answer\" and \"explanation\".",
            topic, concepts_text
        );

        narrate(
            self.client.as_ref(),
            "review questions",
            CompletionRequest::new(prompt)
                .system("You are an AI creating effective review questions for learning.")
                .max_tokens(300)
                .temperature(0.7),
            |reply| extract_json_array(&reply),
            Vec::new,
        )
        .await
    }

    async fn retention_techniques(
        &self,
        topic: &str,
        concepts: &[KeyConcept],
    ) -> Narrative<Vec<RetentionTechnique>> {
        let titles = concepts
            .iter()
            .map(|c| c.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let prompt = format!(
            "Recommend specific retention techniques for learning {} with {} key concepts.\n\n\
             Concepts:\n{}\n\n\
             Provide 3-4 specific techniques that:\n\
             1. Are appropriate for the topic\n\
             2. Can be practically implemented\n\
             3. Include specific steps or methods",
            topic,
            concepts.len(),
            titles
        );

        narrate(
            self.client.as_ref(),
            "retention techniques",
            CompletionRequest::new(prompt)
                .system("You are an AI recommending memory retention techniques.")
                .max_tokens(400)
                .temperature(0.7),
            |reply| {
                Ok(response_lines(&reply)
                    .into_iter()
                    .map(|technique| RetentionTechnique {
                        technique,
                        difficulty: "medium",
                        effectiveness: "high",
                        time_required_minutes: 15,
                    })
                    .collect())
            },
            Vec::new,
        )
        .await
    }

    /// Explain weak assessment areas and plan how to close them
    pub async fn analyze_knowledge_gaps(
        &self,
        topic: &str,
        assessments: &[Assessment],
    ) -> KnowledgeGapReport {
        let mut gaps = Vec::new();
        for area in assessments.iter().filter(|a| a.score < GAP_THRESHOLD) {
            let subtopic = area.subtopic.clone().unwrap_or_else(|| "unknown".to_string());
            let prompt = format!(
                "Analyze this weak performance area in {}:\n\n\
                 Topic: {}\n\
                 Score: {:.2}\n\
                 Details: {}\n\n\
                 Identify:\n\
                 1. Specific concepts not well understood\n\
                 2. Potential reasons for the gap\n\
                 3. Prerequisites that might need review",
                topic,
                subtopic,
                area.score,
                area.details.as_deref().unwrap_or("")
            );

            let concepts = narrate(
                self.client.as_ref(),
                "knowledge gap",
                CompletionRequest::new(prompt)
                    .system("You are an AI analyzing learning gaps.")
                    .max_tokens(300)
                    .temperature(0.5),
                |reply| Ok(response_lines(&reply)),
                Vec::new,
            )
            .await;

            gaps.push(KnowledgeGap {
                subtopic,
                score: area.score,
                severity: if area.score < SEVERE_GAP { "high" } else { "medium" },
                concepts,
            });
        }

        let learning_plan = if gaps.is_empty() {
            Narrative::generated(Vec::new())
        } else {
            self.learning_plan(topic, &gaps).await
        };

        KnowledgeGapReport {
            topic: topic.to_string(),
            identified_gaps: gaps,
            learning_plan,
            analyzed_at: now(),
        }
    }

    async fn learning_plan(&self, topic: &str, gaps: &[KnowledgeGap]) -> Narrative<Vec<String>> {
        let gaps_text = gaps
            .iter()
            .map(|g| format!("- {} (score {:.2}, severity {})", g.subtopic, g.score, g.severity))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Create a focused, step-by-step learning plan for {} that closes these gaps:\n{}\n\n\
             Order the steps so prerequisites come first.",
            topic, gaps_text
        );

        narrate(
            self.client.as_ref(),
            "learning plan",
            CompletionRequest::new(prompt)
                .system("You are an AI creating focused learning plans.")
                .max_tokens(400)
                .temperature(0.7),
            |reply| Ok(response_lines(&reply)),
            Vec::new,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::analytics::learning::Trend;
    use chrono::NaiveDate;

    fn session(topic: &str, kind: &str, performance: f64) -> StudySession {
        StudySession {
            id: 0,
            topic: Some(topic.to_string()),
            session_type: kind.to_string(),
            duration: 30.0,
            performance: Some(performance),
            studied_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_patterns_offline() {
        let sessions = vec![
            session("algebra", "videos", 0.5),
            session("algebra", "notes", 0.8),
        ];
        let report = LearningAdvisor::new(None).analyze_learning_patterns(&sessions).await;

        assert_eq!(report.performance_metrics.trend, Trend::Improving);
        assert_eq!(report.primary_style.as_deref(), Some("reading_writing"));
        assert_eq!(
            report.insights.content(),
            &vec![INSIGHTS_FALLBACK.to_string()]
        );
        assert!(report.recommendations.is_fallback());
    }

    #[tokio::test]
    async fn test_recommendations_prioritize_first() {
        let client: AIClient = MockBackend::new()
            .with_reply("personalized study", "1. Draw mind maps\n2. Watch lectures")
            .into();
        let report = LearningAdvisor::new(Some(client))
            .analyze_learning_patterns(&[session("geo", "diagrams", 0.9)])
            .await;

        let recs = report.recommendations.content();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].priority, "high");
        assert_eq!(recs[1].priority, "medium");
        assert_eq!(recs[0].style_alignment, "visual");
    }

    #[tokio::test]
    async fn test_retention_plan_parses_json() {
        let client: AIClient = MockBackend::new()
            .with_reply(
                "key learning concepts",
                r#"Here you go: [{"title": "Ownership", "explanation": "One owner per value"},
                   {"title": "Borrowing", "explanation": "References"}]"#,
            )
            .with_reply(
                "review questions",
                r#"[{"concept": "Ownership", "question": "Who frees memory?", "type": "open_ended", "answer": "The owner"}]"#,
            )
            .with_reply("retention techniques", "- Flashcards\n- Teach someone")
            .into();

        let plan = LearningAdvisor::new(Some(client))
            .optimize_retention("rust", "Ownership and borrowing ...")
            .await;

        assert_eq!(plan.key_concepts.content().len(), 2);
        assert_eq!(plan.review_questions.content()[0].answer, "The owner");
        assert_eq!(plan.review_schedule.len(), 5);
        assert_eq!(plan.review_schedule[0].estimated_duration, 30);
        assert_eq!(plan.review_schedule[0].concepts_to_review, 2);
        assert_eq!(plan.retention_techniques.content()[1].technique, "Teach someone");
    }

    #[tokio::test]
    async fn test_unparseable_concepts_fall_back() {
        let client: AIClient = MockBackend::new()
            .with_reply("key learning concepts", "1. Ownership\n2. Borrowing")
            .into();
        let plan = LearningAdvisor::new(Some(client))
            .optimize_retention("rust", "text")
            .await;

        assert!(plan.key_concepts.is_fallback());
        assert!(plan.review_questions.content().is_empty());
        assert_eq!(plan.review_schedule[0].concepts_to_review, 0);
    }

    #[tokio::test]
    async fn test_knowledge_gaps() {
        let client: AIClient = MockBackend::new()
            .with_reply("learning gaps", "- Fractions\n- Ratios")
            .with_reply("learning plans", "1. Review fractions\n2. Practice ratios")
            .into();
        let assessments = vec![
            Assessment {
                subtopic: Some("fractions".to_string()),
                score: 0.4,
                details: None,
            },
            Assessment {
                subtopic: Some("ratios".to_string()),
                score: 0.65,
                details: None,
            },
            Assessment {
                subtopic: Some("addition".to_string()),
                score: 0.95,
                details: None,
            },
        ];

        let report = LearningAdvisor::new(Some(client))
            .analyze_knowledge_gaps("math", &assessments)
            .await;

        assert_eq!(report.identified_gaps.len(), 2);
        assert_eq!(report.identified_gaps[0].severity, "high");
        assert_eq!(report.identified_gaps[1].severity, "medium");
        assert_eq!(
            report.identified_gaps[0].concepts.content(),
            &vec!["Fractions".to_string(), "Ratios".to_string()]
        );
        assert_eq!(report.learning_plan.content().len(), 2);
    }
}
