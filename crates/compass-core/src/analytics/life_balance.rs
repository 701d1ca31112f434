//! Life-balance scorer and time-based burnout heuristic
//!
//! Activities are classified into seven life domains through a tag table.
//! A domain scores 1.0 when it takes exactly a seventh of the logged time and
//! falls linearly to 0.0 at twice (or none of) that share.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::round_to;
use crate::models::{Activity, LifeAreaType};

/// The domains scored for time allocation, in display order
pub const BALANCE_DOMAINS: [LifeAreaType; 7] = [
    LifeAreaType::Work,
    LifeAreaType::Health,
    LifeAreaType::Relationships,
    LifeAreaType::PersonalGrowth,
    LifeAreaType::Recreation,
    LifeAreaType::Spirituality,
    LifeAreaType::Community,
];

const DEFAULT_TAGS: &[(LifeAreaType, &[&str])] = &[
    (LifeAreaType::Work, &["meetings", "emails", "projects", "planning"]),
    (LifeAreaType::Health, &["exercise", "meditation", "sleep", "nutrition"]),
    (
        LifeAreaType::Relationships,
        &["family_time", "social_activities", "dating", "communication"],
    ),
    (LifeAreaType::PersonalGrowth, &["learning", "reading", "skills", "hobbies"]),
    (LifeAreaType::Recreation, &["entertainment", "sports", "travel", "relaxation"]),
    (
        LifeAreaType::Spirituality,
        &["meditation", "reflection", "worship", "mindfulness"],
    ),
    (
        LifeAreaType::Community,
        &["volunteering", "networking", "social_causes", "mentoring"],
    ),
];

/// Risk above this is high
const HIGH_RISK: f64 = 0.7;
/// Risk above this is medium
const MEDIUM_RISK: f64 = 0.4;

/// Ordered tag -> domain table; the first domain listing a tag wins
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityTaxonomy {
    entries: Vec<(LifeAreaType, Vec<String>)>,
}

impl Default for ActivityTaxonomy {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TAGS
                .iter()
                .map(|(domain, tags)| (*domain, tags.iter().map(|t| t.to_string()).collect()))
                .collect(),
        }
    }
}

impl ActivityTaxonomy {
    pub fn new(entries: Vec<(LifeAreaType, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// Domain for an activity tag (case-insensitive exact match)
    pub fn classify(&self, activity_type: &str) -> Option<LifeAreaType> {
        let tag = activity_type.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(_, tags)| tags.iter().any(|t| *t == tag))
            .map(|(domain, _)| *domain)
    }
}

/// Classify with the default taxonomy
pub fn classify_activity(activity_type: &str) -> Option<LifeAreaType> {
    ActivityTaxonomy::default().classify(activity_type)
}

/// Time spent on a tagged activity, in hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedActivity {
    #[serde(rename = "type", alias = "activity_type")]
    pub activity_type: String,
    pub duration: f64,
}

impl From<&Activity> for TimedActivity {
    fn from(activity: &Activity) -> Self {
        Self {
            activity_type: activity.activity_type.clone(),
            duration: activity.duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceScores {
    /// Domain name -> score in [0, 1]
    pub domain_scores: BTreeMap<String, f64>,
    /// Mean domain score as a percentage, 2 decimals
    pub balance_score: f64,
}

impl BalanceScores {
    pub fn score(&self, domain: LifeAreaType) -> f64 {
        self.domain_scores
            .get(domain.as_str())
            .copied()
            .unwrap_or(0.0)
    }
}

/// Score how evenly time is spread across the domains
///
/// Unclassified activities count toward total time but no domain. With no
/// logged time every domain scores 0.
pub fn score_balance(taxonomy: &ActivityTaxonomy, activities: &[TimedActivity]) -> BalanceScores {
    let total_time: f64 = activities.iter().map(|a| a.duration).sum();

    let mut domain_times: BTreeMap<LifeAreaType, f64> = BTreeMap::new();
    for activity in activities {
        if let Some(domain) = taxonomy.classify(&activity.activity_type) {
            *domain_times.entry(domain).or_insert(0.0) += activity.duration;
        }
    }

    let ideal = 1.0 / BALANCE_DOMAINS.len() as f64;
    let domain_scores: BTreeMap<String, f64> = BALANCE_DOMAINS
        .iter()
        .map(|domain| {
            let score = if total_time > 0.0 {
                let actual = domain_times.get(domain).copied().unwrap_or(0.0) / total_time;
                1.0 - ((actual - ideal).abs() / ideal).min(1.0)
            } else {
                0.0
            };
            (domain.as_str().to_string(), score)
        })
        .collect();

    let mean = domain_scores.values().sum::<f64>() / BALANCE_DOMAINS.len() as f64;

    BalanceScores {
        domain_scores,
        balance_score: round_to(mean * 100.0, 2),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Not enough information to assess
    Unknown,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK {
            Self::High
        } else if score > MEDIUM_RISK {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurnoutAssessment {
    pub risk_level: RiskLevel,
    /// In [0, 1], 2 decimals
    pub risk_score: f64,
    pub work_time: f64,
    /// Health plus recreation time
    pub rest_time: f64,
}

/// Burnout risk from the ratio of rest to work time
pub fn burnout_from_times(work_time: f64, rest_time: f64) -> BurnoutAssessment {
    let risk = (1.0 - rest_time / (work_time + 1e-6)).clamp(0.0, 1.0);
    let risk_score = round_to(risk, 2);
    BurnoutAssessment {
        risk_level: RiskLevel::from_score(risk_score),
        risk_score,
        work_time,
        rest_time,
    }
}

pub fn assess_burnout(
    taxonomy: &ActivityTaxonomy,
    activities: &[TimedActivity],
) -> BurnoutAssessment {
    let mut work_time = 0.0;
    let mut rest_time = 0.0;
    for activity in activities {
        match taxonomy.classify(&activity.activity_type) {
            Some(LifeAreaType::Work) => work_time += activity.duration,
            Some(LifeAreaType::Recreation) | Some(LifeAreaType::Health) => {
                rest_time += activity.duration
            }
            _ => {}
        }
    }
    burnout_from_times(work_time, rest_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(tag: &str, hours: f64) -> TimedActivity {
        TimedActivity {
            activity_type: tag.to_string(),
            duration: hours,
        }
    }

    #[test]
    fn test_first_listed_domain_wins() {
        // "meditation" is listed under health before spirituality
        assert_eq!(classify_activity("Meditation"), Some(LifeAreaType::Health));
        assert_eq!(classify_activity("worship"), Some(LifeAreaType::Spirituality));
        assert_eq!(classify_activity("gardening"), None);
    }

    #[test]
    fn test_even_split_scores_perfectly() {
        let activities = vec![
            activity("meetings", 2.0),
            activity("exercise", 2.0),
            activity("family_time", 2.0),
            activity("reading", 2.0),
            activity("travel", 2.0),
            activity("worship", 2.0),
            activity("volunteering", 2.0),
        ];
        let scores = score_balance(&ActivityTaxonomy::default(), &activities);

        for domain in BALANCE_DOMAINS {
            assert!((scores.score(domain) - 1.0).abs() < 1e-9, "{}", domain);
        }
        assert_eq!(scores.balance_score, 100.0);
    }

    #[test]
    fn test_single_domain_is_unbalanced() {
        let scores = score_balance(
            &ActivityTaxonomy::default(),
            &[activity("meetings", 40.0)],
        );
        // Work takes 100% (far above 1/7), everything else 0%
        assert_eq!(scores.score(LifeAreaType::Work), 0.0);
        assert_eq!(scores.score(LifeAreaType::Health), 0.0);
        assert_eq!(scores.balance_score, 0.0);
    }

    #[test]
    fn test_no_time_scores_zero() {
        let scores = score_balance(&ActivityTaxonomy::default(), &[]);
        assert_eq!(scores.domain_scores.len(), 7);
        assert_eq!(scores.balance_score, 0.0);
    }

    #[test]
    fn test_burnout_thresholds() {
        let balanced = burnout_from_times(10.0, 10.0);
        assert_eq!(balanced.risk_score, 0.0);
        assert_eq!(balanced.risk_level, RiskLevel::Low);

        let no_rest = burnout_from_times(10.0, 0.0);
        assert_eq!(no_rest.risk_score, 1.0);
        assert_eq!(no_rest.risk_level, RiskLevel::High);

        assert_eq!(burnout_from_times(10.0, 5.0).risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_assess_burnout_counts_health_and_recreation_as_rest() {
        let activities = vec![
            activity("projects", 8.0),
            activity("sleep", 2.0),
            activity("sports", 2.0),
            activity("reading", 5.0),
        ];
        let burnout = assess_burnout(&ActivityTaxonomy::default(), &activities);
        assert_eq!(burnout.work_time, 8.0);
        assert_eq!(burnout.rest_time, 4.0);
        assert_eq!(burnout.risk_score, 0.5);
        assert_eq!(burnout.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_custom_taxonomy() {
        let taxonomy = ActivityTaxonomy::new(vec![(
            LifeAreaType::Community,
            vec!["choir".to_string()],
        )]);
        assert_eq!(taxonomy.classify("Choir"), Some(LifeAreaType::Community));
        assert_eq!(taxonomy.classify("meetings"), None);
    }
}
