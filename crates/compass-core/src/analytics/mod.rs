//! Pure analytics over already-loaded records
//!
//! Every function here is synchronous and side-effect free. Callers fetch the
//! records (from the database or a request body) and pass them in; results are
//! serializable summaries. Absent input is reported as [`AnalyticsError::NoData`]
//! and unusable input as [`AnalyticsError::MalformedInput`] so callers can tell
//! the two apart.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

pub mod birthdays;
pub mod budget;
pub mod cashflow;
pub mod email;
pub mod goals;
pub mod learning;
pub mod life_balance;
pub mod me_time;
pub mod portfolio;
pub mod sleep;
pub mod spaced_repetition;
pub mod spending;
pub mod tasks;
pub mod wheel;

pub use budget::{recommend_budget, BudgetRecommendation, CategoryRecommendation, ExpenseItem};
pub use cashflow::{project_cash_flow, CashFlowItem, CashFlowMonth, CashFlowProjection, Frequency};
pub use life_balance::{
    assess_burnout, classify_activity, score_balance, ActivityTaxonomy, BalanceScores,
    BurnoutAssessment, RiskLevel, TimedActivity, BALANCE_DOMAINS,
};
pub use spaced_repetition::{review_schedule, ReviewKind, ReviewSession};
pub use spending::{analyze_spending, SpendingAnalysis, SpendingRecord};

/// Why an analysis produced no result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Nothing to analyze
    #[error("{0}")]
    NoData(String),

    /// Input present but missing a required field
    #[error("{0}")]
    MalformedInput(String),

    /// The completion service failed or replied with something unusable
    #[error("{0}")]
    Upstream(String),
}

/// Longest cash-flow projection, in months
pub const MAX_MONTHS_AHEAD: u32 = 120;

/// Longest look-ahead for day-based schedules and reminder windows
pub const MAX_DAYS_AHEAD: i64 = 3650;

/// Reject a look-ahead outside `0..=max`
pub fn check_horizon(value: i64, max: i64, unit: &str) -> Result<(), AnalyticsError> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        Err(AnalyticsError::MalformedInput(format!(
            "Look-ahead must be between 0 and {} {}",
            max, unit
        )))
    }
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Named analysis window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    /// Lenient parse: "month" and "year" are recognized, anything else is a week
    pub fn parse_or_week(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "month" => Self::Month,
            "year" => Self::Year,
            _ => Self::Week,
        }
    }

    /// Lenient parse for statistics endpoints where the default is a month
    pub fn parse_or_month(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "week" => Self::Week,
            "year" => Self::Year,
            _ => Self::Month,
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// `(end - days, end)`
    pub fn window_ending(&self, end: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        (end - Duration::days(self.days()), end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.346, 2), 2.35);
        assert_eq!(round_to(66.666_666, 1), 66.7);
        assert_eq!(round_to(-1.25, 1), -1.3);
    }

    #[test]
    fn test_period_windows() {
        assert_eq!(Period::parse_or_week("month").days(), 30);
        assert_eq!(Period::parse_or_week("YEAR").days(), 365);
        assert_eq!(Period::parse_or_week("fortnight").days(), 7);
        assert_eq!(Period::parse_or_month("quarter"), Period::Month);
        assert_eq!(Period::parse_or_month("week"), Period::Week);
    }

    #[test]
    fn test_check_horizon() {
        assert!(check_horizon(0, MAX_DAYS_AHEAD, "days").is_ok());
        assert!(check_horizon(MAX_DAYS_AHEAD, MAX_DAYS_AHEAD, "days").is_ok());
        assert!(matches!(
            check_horizon(MAX_DAYS_AHEAD + 1, MAX_DAYS_AHEAD, "days"),
            Err(AnalyticsError::MalformedInput(_))
        ));
        assert!(check_horizon(-1, MAX_DAYS_AHEAD, "days").is_err());
    }
}
