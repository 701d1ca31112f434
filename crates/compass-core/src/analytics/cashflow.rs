//! Cash-flow projector
//!
//! Months are approximated as 30-day steps from the first day of the starting
//! month, so a bucket's label can repeat or skip a calendar month. Each bucket
//! is still one projected month.

use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use super::{check_horizon, round_to, AnalyticsError, MAX_MONTHS_AHEAD};

pub const DEFAULT_MONTHS_AHEAD: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    #[default]
    Monthly,
    BiWeekly,
    Weekly,
    /// Counted in the first projected month only
    Annual,
    /// Counted in every third month starting with the first
    Quarterly,
}

impl Frequency {
    /// Multiplier applied to an amount in bucket `index`
    pub fn factor(&self, index: u32) -> f64 {
        match self {
            Self::Monthly => 1.0,
            Self::BiWeekly => 2.17,
            Self::Weekly => 4.33,
            Self::Annual if index == 0 => 1.0,
            Self::Quarterly if index % 3 == 0 => 1.0,
            Self::Annual | Self::Quarterly => 0.0,
        }
    }
}

/// A recurring income source or expense
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CashFlowItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowMonth {
    /// "YYYY-MM"
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_net: f64,
    pub average_monthly_net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowProjection {
    pub projections: Vec<CashFlowMonth>,
    pub summary: CashFlowSummary,
}

fn bucket_total(items: &[CashFlowItem], index: u32) -> f64 {
    items
        .iter()
        .map(|item| item.amount * item.frequency.factor(index))
        .sum()
}

/// Project `months_ahead` buckets starting at the month containing `today`
///
/// More than [`MAX_MONTHS_AHEAD`] months is `MalformedInput`.
pub fn project_cash_flow(
    income_sources: &[CashFlowItem],
    recurring_expenses: &[CashFlowItem],
    months_ahead: u32,
    today: NaiveDate,
) -> Result<CashFlowProjection, AnalyticsError> {
    check_horizon(months_ahead as i64, MAX_MONTHS_AHEAD as i64, "months")?;
    let first = today.with_day(1).unwrap_or(today);

    let projections = (0..months_ahead)
        .map(|i| {
            let start = TimeDelta::try_days(30 * i as i64)
                .and_then(|offset| first.checked_add_signed(offset))
                .ok_or_else(|| {
                    AnalyticsError::MalformedInput("Projection runs past the calendar".to_string())
                })?;
            let income = bucket_total(income_sources, i);
            let expenses = bucket_total(recurring_expenses, i);
            Ok(CashFlowMonth {
                month: start.format("%Y-%m").to_string(),
                income: round_to(income, 2),
                expenses: round_to(expenses, 2),
                net: round_to(income - expenses, 2),
            })
        })
        .collect::<Result<Vec<_>, AnalyticsError>>()?;

    let total_income: f64 = projections.iter().map(|m| m.income).sum();
    let total_expenses: f64 = projections.iter().map(|m| m.expenses).sum();
    let total_net: f64 = projections.iter().map(|m| m.net).sum();
    let average_monthly_net = if months_ahead > 0 {
        total_net / months_ahead as f64
    } else {
        0.0
    };

    Ok(CashFlowProjection {
        projections,
        summary: CashFlowSummary {
            total_income: round_to(total_income, 2),
            total_expenses: round_to(total_expenses, 2),
            total_net: round_to(total_net, 2),
            average_monthly_net: round_to(average_monthly_net, 2),
        },
    })
}
