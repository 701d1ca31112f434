//! Life-balance coaching

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{complete, narrate, Narrative};
use crate::ai::parsing::{response_lines, strip_bullet};
use crate::ai::{AIClient, CompletionRequest};
use crate::analytics::life_balance::{
    assess_burnout, score_balance, ActivityTaxonomy, BalanceScores, RiskLevel, TimedActivity,
    BALANCE_DOMAINS,
};
use crate::db::now;
use crate::error::Result;
use crate::models::LifeAreaType;

/// Domains scoring below this get a recommendation
const RECOMMEND_BELOW: f64 = 0.6;
/// Recommendations for domains below this are high priority
const HIGH_PRIORITY_BELOW: f64 = 0.4;
/// Activities included in the insights prompt
const PROMPT_ACTIVITY_LIMIT: usize = 10;

const INSIGHTS_FALLBACK: &str = "Unable to generate insights at this time.";
const BURNOUT_FALLBACK: &str = "Unable to assess burnout risk at this time.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainRecommendation {
    pub domain: LifeAreaType,
    pub recommendation: String,
    /// "high" or "medium"
    pub priority: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurnoutReport {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub work_time: f64,
    pub rest_time: f64,
    pub analysis: Narrative<Vec<String>>,
    /// Analysis lines other than the risk and warning lines
    pub contributing_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub balance_score: f64,
    pub domain_scores: BTreeMap<String, f64>,
    pub insights: Narrative<Vec<String>>,
    pub recommendations: Narrative<Vec<DomainRecommendation>>,
    pub burnout_risk: BurnoutReport,
    pub analyzed_at: NaiveDateTime,
    pub timeframe: String,
}

/// A block in a schedule submitted for optimization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    #[serde(rename = "type", alias = "activity_type")]
    pub activity_type: String,
    /// Free-form time ("Mon 09:00")
    pub time: String,
    /// Hours
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleChange {
    pub change: String,
    pub impact: &'static str,
    pub feasibility: &'static str,
}

/// Balance scoring plus coaching prose
#[derive(Clone, Default)]
pub struct LifeBalanceAdvisor {
    client: Option<AIClient>,
    taxonomy: ActivityTaxonomy,
}

impl LifeBalanceAdvisor {
    pub fn new(client: Option<AIClient>) -> Self {
        Self {
            client,
            taxonomy: ActivityTaxonomy::default(),
        }
    }

    pub fn with_taxonomy(mut self, taxonomy: ActivityTaxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    pub async fn analyze_balance(
        &self,
        activities: &[TimedActivity],
        timeframe: &str,
    ) -> BalanceReport {
        let scores = score_balance(&self.taxonomy, activities);
        let insights = self.insights(&scores, activities).await;
        let recommendations = self.recommendations(&scores).await;
        let burnout_risk = self.burnout(&scores, activities).await;

        BalanceReport {
            balance_score: scores.balance_score,
            domain_scores: scores.domain_scores,
            insights,
            recommendations,
            burnout_risk,
            analyzed_at: now(),
            timeframe: timeframe.to_string(),
        }
    }

    async fn insights(
        &self,
        scores: &BalanceScores,
        activities: &[TimedActivity],
    ) -> Narrative<Vec<String>> {
        let scores_text = BALANCE_DOMAINS
            .iter()
            .map(|d| format!("{}: {:.2}", d, scores.score(*d)))
            .collect::<Vec<_>>()
            .join("\n");
        let activities_text = activities
            .iter()
            .take(PROMPT_ACTIVITY_LIMIT)
            .map(|a| format!("Activity: {}, Duration: {}", a.activity_type, a.duration))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Analyze the following life balance data and provide key insights:\n\n\
             Domain Scores:\n{}\n\n\
             Recent Activities:\n{}\n\n\
             Provide 3-5 specific, actionable insights about the person's life balance.\n\
             Focus on patterns, areas needing attention, and positive aspects.",
            scores_text, activities_text
        );

        narrate(
            self.client.as_ref(),
            "balance insights",
            CompletionRequest::new(prompt)
                .system("You are an AI life coach analyzing work-life balance data.")
                .max_tokens(300)
                .temperature(0.7),
            |reply| Ok(response_lines(&reply)),
            || vec![INSIGHTS_FALLBACK.to_string()],
        )
        .await
    }

    async fn recommendations(
        &self,
        scores: &BalanceScores,
    ) -> Narrative<Vec<DomainRecommendation>> {
        let low: Vec<(LifeAreaType, f64)> = BALANCE_DOMAINS
            .iter()
            .map(|d| (*d, scores.score(*d)))
            .filter(|(_, score)| *score < RECOMMEND_BELOW)
            .collect();

        let client = self.client.as_ref();
        let result = Self::recommend_each(client, &low).await;

        match result {
            Ok(recommendations) => Narrative::generated(recommendations),
            Err(e) => {
                if client.is_some() {
                    warn!(error = %e, "Balance recommendations failed, returning none");
                }
                Narrative::fallback(Vec::new(), e.to_string())
            }
        }
    }

    async fn recommend_each(
        client: Option<&AIClient>,
        domains: &[(LifeAreaType, f64)],
    ) -> Result<Vec<DomainRecommendation>> {
        let mut recommendations = Vec::with_capacity(domains.len());
        for (domain, score) in domains {
            let prompt = format!(
                "Generate a specific, actionable recommendation for improving the '{}' \
                 aspect of life balance.\n\
                 Consider current activities and make the suggestion practical and achievable.\n\
                 Include both what to do and how to implement it.",
                domain
            );
            let request = CompletionRequest::new(prompt)
                .system("You are an AI life coach providing practical recommendations.")
                .max_tokens(200)
                .temperature(0.7);
            recommendations.push(DomainRecommendation {
                domain: *domain,
                recommendation: complete(client, &request).await?,
                priority: if *score < HIGH_PRIORITY_BELOW { "high" } else { "medium" },
            });
        }
        Ok(recommendations)
    }

    async fn burnout(&self, scores: &BalanceScores, activities: &[TimedActivity]) -> BurnoutReport {
        let heuristic = assess_burnout(&self.taxonomy, activities);

        let prompt = format!(
            "Assess burnout risk based on the following data:\n\
             - Work time: {} hours\n\
             - Rest time: {} hours\n\
             - Work-life balance scores:\n\
             \x20 * Work domain: {:.2}\n\
             \x20 * Health domain: {:.2}\n\
             \x20 * Recreation domain: {:.2}\n\n\
             Provide:\n\
             1. Risk level (low, medium, high)\n\
             2. Key contributing factors\n\
             3. Early warning signs to watch for",
            heuristic.work_time,
            heuristic.rest_time,
            scores.score(LifeAreaType::Work),
            scores.score(LifeAreaType::Health),
            scores.score(LifeAreaType::Recreation),
        );

        let raw = narrate(
            self.client.as_ref(),
            "burnout analysis",
            CompletionRequest::new(prompt)
                .system("You are an AI analyzing burnout risk factors.")
                .max_tokens(250)
                .temperature(0.5),
            |reply| Ok(reply.lines().map(str::to_string).collect::<Vec<_>>()),
            || vec![BURNOUT_FALLBACK.to_string()],
        )
        .await;

        let contributing_factors = if raw.is_fallback() {
            Vec::new()
        } else {
            raw.content()
                .iter()
                .filter(|line| !line.starts_with("Risk") && !line.starts_with("Warning"))
                .map(|line| strip_bullet(line).to_string())
                .filter(|line| !line.is_empty())
                .collect()
        };

        BurnoutReport {
            risk_level: heuristic.risk_level,
            risk_score: heuristic.risk_score,
            work_time: heuristic.work_time,
            rest_time: heuristic.rest_time,
            analysis: raw.map(|lines| lines.into_iter().filter(|l| !l.trim().is_empty()).collect()),
            contributing_factors,
        }
    }

    /// Suggest schedule adjustments that respect the given preferences
    pub async fn optimize_schedule(
        &self,
        schedule: &[ScheduleItem],
        preferences: &BTreeMap<String, serde_json::Value>,
    ) -> Narrative<Vec<ScheduleChange>> {
        let schedule_text = schedule
            .iter()
            .map(|item| {
                format!(
                    "Activity: {}, Time: {}, Duration: {}",
                    item.activity_type, item.time, item.duration
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let preferences_text = preferences
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => format!("{}: {}", key, s),
                other => format!("{}: {}", key, other),
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Optimize the following schedule for better work-life balance:\n\n\
             Current Schedule:\n{}\n\n\
             User Preferences:\n{}\n\n\
             Provide specific recommendations for schedule adjustments that would improve \
             balance while respecting preferences.\n\
             Include both what to change and why.",
            schedule_text, preferences_text
        );

        narrate(
            self.client.as_ref(),
            "schedule optimization",
            CompletionRequest::new(prompt)
                .system("You are an AI schedule optimizer focused on improving work-life balance.")
                .max_tokens(400)
                .temperature(0.7),
            |reply| {
                Ok(response_lines(&reply)
                    .into_iter()
                    .map(|change| ScheduleChange {
                        change,
                        impact: "high",
                        feasibility: "medium",
                    })
                    .collect())
            },
            Vec::new,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;

    fn activity(tag: &str, hours: f64) -> TimedActivity {
        TimedActivity {
            activity_type: tag.to_string(),
            duration: hours,
        }
    }

    fn week() -> Vec<TimedActivity> {
        vec![
            activity("meetings", 30.0),
            activity("projects", 10.0),
            activity("exercise", 3.0),
            activity("reading", 2.0),
        ]
    }

    #[tokio::test]
    async fn test_without_client_uses_fallbacks() {
        let report = LifeBalanceAdvisor::new(None).analyze_balance(&week(), "week").await;

        assert!(report.insights.is_fallback());
        assert_eq!(report.insights.content(), &vec![INSIGHTS_FALLBACK.to_string()]);
        assert!(report.recommendations.content().is_empty());
        assert_eq!(
            report.burnout_risk.analysis.content(),
            &vec![BURNOUT_FALLBACK.to_string()]
        );
        assert!(report.burnout_risk.contributing_factors.is_empty());
        // The heuristic is computed regardless
        assert_eq!(report.burnout_risk.work_time, 40.0);
        assert_eq!(report.burnout_risk.rest_time, 3.0);
        assert_eq!(report.burnout_risk.risk_level, RiskLevel::High);
        assert_eq!(report.timeframe, "week");
    }

    #[tokio::test]
    async fn test_generated_narratives() {
        let client: AIClient = MockBackend::new()
            .with_reply("analyzing work-life balance", "- Work dominates\n\n- Good exercise habit")
            .with_reply("practical recommendations", "Schedule a weekly call with family.")
            .with_reply(
                "burnout risk",
                "Risk level: high\n- Long meeting hours\nWarning signs: fatigue\n- Little recreation",
            )
            .into();
        let report = LifeBalanceAdvisor::new(Some(client))
            .analyze_balance(&week(), "week")
            .await;

        assert_eq!(
            report.insights.content(),
            &vec!["Work dominates".to_string(), "Good exercise habit".to_string()]
        );

        // Work takes 40 of 45 hours, so every domain is off balance
        let recommendations = report.recommendations.content();
        assert!(!report.recommendations.is_fallback());
        assert_eq!(recommendations.len(), 7);
        let priority_of = |domain| {
            recommendations
                .iter()
                .find(|r| r.domain == domain)
                .map(|r| r.priority)
        };
        assert_eq!(priority_of(LifeAreaType::Health), Some("medium"));
        assert_eq!(priority_of(LifeAreaType::Relationships), Some("high"));
        assert_eq!(
            recommendations[0].recommendation,
            "Schedule a weekly call with family."
        );

        assert_eq!(
            report.burnout_risk.contributing_factors,
            vec!["Long meeting hours", "Little recreation"]
        );
        assert_eq!(report.burnout_risk.analysis.content().len(), 4);
    }

    #[tokio::test]
    async fn test_failing_client_drops_all_recommendations() {
        let client: AIClient = MockBackend::failing().into();
        let report = LifeBalanceAdvisor::new(Some(client))
            .analyze_balance(&week(), "month")
            .await;
        assert!(report.recommendations.is_fallback());
        assert!(report.recommendations.content().is_empty());
    }

    #[tokio::test]
    async fn test_optimize_schedule() {
        let client: AIClient = MockBackend::new()
            .with_reply("schedule optimizer", "- Move gym to mornings\n- Block lunch")
            .into();
        let schedule = vec![ScheduleItem {
            activity_type: "meetings".to_string(),
            time: "Mon 09:00".to_string(),
            duration: 3.0,
        }];
        let preferences = BTreeMap::from([("wake_time".to_string(), serde_json::json!("06:30"))]);

        let changes = LifeBalanceAdvisor::new(Some(client))
            .optimize_schedule(&schedule, &preferences)
            .await;
        let changes = changes.content();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].change, "Move gym to mornings");
        assert_eq!(changes[0].impact, "high");
        assert_eq!(changes[1].feasibility, "medium");

        let offline = LifeBalanceAdvisor::new(None)
            .optimize_schedule(&schedule, &preferences)
            .await;
        assert!(offline.content().is_empty());
    }
}
