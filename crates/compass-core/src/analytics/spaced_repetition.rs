//! Spaced-repetition review scheduling

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Days after study at which each review falls
pub const REVIEW_INTERVALS: [i64; 5] = [1, 3, 7, 14, 30];

/// Minutes of review per concept
const MINUTES_PER_CONCEPT: u32 = 5;
const MIN_REVIEW_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewKind {
    /// Up to a week out
    Quick,
    Comprehensive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSession {
    pub review_date: NaiveDateTime,
    pub interval_days: i64,
    /// Minutes
    pub estimated_duration: u32,
    pub review_type: ReviewKind,
    pub concepts_to_review: u32,
}

/// One review per interval, counted from `now`
pub fn review_schedule(concepts: u32, now: NaiveDateTime) -> Vec<ReviewSession> {
    let estimated_duration = MIN_REVIEW_MINUTES.max(concepts.saturating_mul(MINUTES_PER_CONCEPT));

    REVIEW_INTERVALS
        .iter()
        .map(|&days| ReviewSession {
            review_date: now + Duration::days(days),
            interval_days: days,
            estimated_duration,
            review_type: if days > 7 {
                ReviewKind::Comprehensive
            } else {
                ReviewKind::Quick
            },
            concepts_to_review: concepts,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_four_concepts_get_minimum_duration() {
        let schedule = review_schedule(4, noon());
        assert_eq!(schedule.len(), 5);
        for (session, days) in schedule.iter().zip(REVIEW_INTERVALS) {
            assert_eq!(session.estimated_duration, 30);
            assert_eq!(session.review_date, noon() + Duration::days(days));
        }
    }

    #[test]
    fn test_review_kinds_and_scaling() {
        let schedule = review_schedule(10, noon());
        assert_eq!(schedule[0].estimated_duration, 50);
        assert_eq!(schedule[2].review_type, ReviewKind::Quick);
        assert_eq!(schedule[3].review_type, ReviewKind::Comprehensive);
        assert_eq!(schedule[4].interval_days, 30);
    }
}
