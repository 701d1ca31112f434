//! Learning-style and study performance analysis

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::round_to;
use crate::models::StudySession;

/// Style -> keywords matched as substrings of a session's type
const LEARNING_STYLES: &[(&str, &[&str])] = &[
    ("visual", &["diagrams", "charts", "videos", "mind_maps"]),
    (
        "auditory",
        &["lectures", "discussions", "audio_books", "verbal_explanations"],
    ),
    (
        "kinesthetic",
        &["hands_on", "experiments", "role_playing", "physical_activities"],
    ),
    (
        "reading_writing",
        &["textbooks", "notes", "articles", "written_exercises"],
    ),
];

/// Performance assumed for style weighting when a session has none
const DEFAULT_STYLE_PERFORMANCE: f64 = 0.5;
const UNKNOWN_TOPIC: &str = "unknown";

/// Style name -> share of study time weighted by performance, 3 decimals
pub type LearningStyleScores = BTreeMap<String, f64>;

/// Score each learning style from session types
///
/// A session adds `duration * performance` to every style with a keyword
/// contained in its lowercased type; totals are divided by all study time.
pub fn learning_style_scores(sessions: &[StudySession]) -> LearningStyleScores {
    let total_duration: f64 = sessions.iter().map(|s| s.duration).sum();

    let mut scores: LearningStyleScores = LEARNING_STYLES
        .iter()
        .map(|(style, _)| (style.to_string(), 0.0))
        .collect();

    for session in sessions {
        let session_type = session.session_type.to_lowercase();
        let weight = session.duration * session.performance.unwrap_or(DEFAULT_STYLE_PERFORMANCE);
        for (style, keywords) in LEARNING_STYLES {
            if keywords.iter().any(|k| session_type.contains(k)) {
                if let Some(score) = scores.get_mut(*style) {
                    *score += weight;
                }
            }
        }
    }

    if total_duration > 0.0 {
        for score in scores.values_mut() {
            *score = round_to(*score / total_duration, 3);
        }
    }
    scores
}

/// The highest-scoring style, if any scored above zero
pub fn primary_style(scores: &LearningStyleScores) -> Option<&str> {
    scores
        .iter()
        .filter(|(_, score)| **score > 0.0)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(style, _)| style.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub average_performance: f64,
    pub trend: Trend,
    /// Up to three topics, best first
    pub best_performing_topics: Vec<String>,
    /// The three lowest-averaging topics, in descending order
    pub needs_improvement: Vec<String>,
}

/// Average, trend, and per-topic ranking; sessions must be chronological
///
/// Missing performance counts as 0 here.
pub fn performance_metrics(sessions: &[StudySession]) -> PerformanceMetrics {
    if sessions.is_empty() {
        return PerformanceMetrics {
            average_performance: 0.0,
            trend: Trend::Neutral,
            best_performing_topics: Vec::new(),
            needs_improvement: Vec::new(),
        };
    }

    let performances: Vec<f64> = sessions
        .iter()
        .map(|s| s.performance.unwrap_or(0.0))
        .collect();
    let average = performances.iter().sum::<f64>() / performances.len() as f64;

    let trend = match (performances.first(), performances.last()) {
        (Some(first), Some(last)) if performances.len() > 1 && last > first => Trend::Improving,
        _ => Trend::Declining,
    };

    let mut by_topic: HashMap<&str, Vec<f64>> = HashMap::new();
    for (session, performance) in sessions.iter().zip(&performances) {
        by_topic
            .entry(session.topic.as_deref().unwrap_or(UNKNOWN_TOPIC))
            .or_default()
            .push(*performance);
    }

    let mut ranked: Vec<(&str, f64)> = by_topic
        .into_iter()
        .map(|(topic, perfs)| (topic, perfs.iter().sum::<f64>() / perfs.len() as f64))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let best = ranked.iter().take(3).map(|(t, _)| t.to_string()).collect();
    let worst = ranked
        .iter()
        .skip(ranked.len().saturating_sub(3))
        .map(|(t, _)| t.to_string())
        .collect();

    PerformanceMetrics {
        average_performance: round_to(average, 3),
        trend,
        best_performing_topics: best,
        needs_improvement: worst,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session(topic: &str, kind: &str, minutes: f64, performance: Option<f64>) -> StudySession {
        StudySession {
            id: 0,
            topic: Some(topic.to_string()),
            session_type: kind.to_string(),
            duration: minutes,
            performance,
            studied_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_style_scores_weight_by_duration_and_performance() {
        let sessions = vec![
            session("rust", "Watching videos", 60.0, Some(1.0)),
            session("rust", "hands_on lab", 30.0, None),
            session("rust", "nap", 10.0, Some(1.0)),
        ];
        let scores = learning_style_scores(&sessions);

        assert_eq!(scores["visual"], 0.6);
        assert_eq!(scores["kinesthetic"], 0.15);
        assert_eq!(scores["auditory"], 0.0);
        assert_eq!(primary_style(&scores), Some("visual"));
    }

    #[test]
    fn test_no_sessions_is_neutral() {
        let metrics = performance_metrics(&[]);
        assert_eq!(metrics.trend, Trend::Neutral);
        assert_eq!(metrics.average_performance, 0.0);
        assert!(primary_style(&learning_style_scores(&[])).is_none());
    }

    #[test]
    fn test_trend_and_topic_ranking() {
        let sessions = vec![
            session("algebra", "notes", 30.0, Some(0.4)),
            session("geometry", "notes", 30.0, Some(0.9)),
            session("history", "articles", 30.0, Some(0.6)),
            session("biology", "diagrams", 30.0, Some(0.7)),
        ];
        let metrics = performance_metrics(&sessions);

        assert_eq!(metrics.trend, Trend::Improving);
        assert_eq!(metrics.average_performance, 0.65);
        assert_eq!(
            metrics.best_performing_topics,
            vec!["geometry", "biology", "history"]
        );
        assert_eq!(
            metrics.needs_improvement,
            vec!["biology", "history", "algebra"]
        );
    }

    #[test]
    fn test_single_session_counts_as_declining() {
        let metrics = performance_metrics(&[session("x", "notes", 10.0, Some(0.9))]);
        assert_eq!(metrics.trend, Trend::Declining);
    }
}
