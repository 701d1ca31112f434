//! Spending analyzer
//!
//! Spending is the negative-amount subset of the input, taken as absolute
//! values. Outliers are spends above `mean + 2 * sample standard deviation`.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{round_to, AnalyticsError};
use crate::models::Transaction;

/// A transaction as supplied to the analyzer; every field may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingRecord {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Transaction> for SpendingRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            amount: Some(tx.amount),
            category: Some(tx.category.clone()),
            date: Some(tx.date),
            description: tx.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub sum: f64,
    pub count: usize,
    pub mean: f64,
    /// Share of total spending, 2 decimals
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySpending {
    /// "YYYY-MM"
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemporalAnalysis {
    pub monthly: Vec<MonthlySpending>,
    /// Weekday name -> total spent
    pub day_of_week: BTreeMap<String, f64>,
}

/// A spend flagged as unusually large, amount shown positive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingAnomaly {
    pub amount: f64,
    pub category: String,
    pub date: Option<NaiveDateTime>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingAnalysis {
    pub total_spending: f64,
    pub category_analysis: Vec<CategorySpending>,
    pub temporal_analysis: TemporalAnalysis,
    pub anomalies: Vec<SpendingAnomaly>,
    pub transaction_count: usize,
}

const UNCATEGORIZED: &str = "uncategorized";

/// Analyze spending patterns
///
/// Empty input is `NoData`; input where no record carries an amount is
/// `MalformedInput`. Records without an amount are otherwise skipped, and
/// records without a date are left out of the temporal breakdown only.
pub fn analyze_spending(records: &[SpendingRecord]) -> Result<SpendingAnalysis, AnalyticsError> {
    if records.is_empty() {
        return Err(AnalyticsError::NoData(
            "No transaction data provided".to_string(),
        ));
    }
    if records.iter().all(|r| r.amount.is_none()) {
        return Err(AnalyticsError::MalformedInput(
            "No valid transaction data provided".to_string(),
        ));
    }

    let spends: Vec<(&SpendingRecord, f64)> = records
        .iter()
        .filter_map(|r| match r.amount {
            Some(amount) if amount < 0.0 => Some((r, amount.abs())),
            _ => None,
        })
        .collect();

    let total_spending: f64 = spends.iter().map(|(_, amount)| amount).sum();

    Ok(SpendingAnalysis {
        total_spending,
        category_analysis: category_breakdown(&spends, total_spending),
        temporal_analysis: temporal_breakdown(&spends),
        anomalies: find_anomalies(&spends),
        transaction_count: spends.len(),
    })
}

fn category_of(record: &SpendingRecord) -> &str {
    record.category.as_deref().unwrap_or(UNCATEGORIZED)
}

fn category_breakdown(spends: &[(&SpendingRecord, f64)], total: f64) -> Vec<CategorySpending> {
    let mut by_category: HashMap<&str, (f64, usize)> = HashMap::new();
    for (record, amount) in spends {
        let entry = by_category.entry(category_of(record)).or_insert((0.0, 0));
        entry.0 += amount;
        entry.1 += 1;
    }

    let mut categories: Vec<CategorySpending> = by_category
        .into_iter()
        .map(|(category, (sum, count))| CategorySpending {
            category: category.to_string(),
            sum,
            count,
            mean: sum / count as f64,
            percentage: if total > 0.0 {
                round_to(sum / total * 100.0, 2)
            } else {
                0.0
            },
        })
        .collect();

    categories.sort_by(|a, b| {
        b.sum
            .total_cmp(&a.sum)
            .then_with(|| a.category.cmp(&b.category))
    });
    categories
}

fn temporal_breakdown(spends: &[(&SpendingRecord, f64)]) -> TemporalAnalysis {
    let mut monthly: BTreeMap<String, f64> = BTreeMap::new();
    let mut day_of_week: BTreeMap<String, f64> = BTreeMap::new();

    for (record, amount) in spends {
        let Some(date) = record.date else { continue };
        *monthly.entry(date.format("%Y-%m").to_string()).or_insert(0.0) += amount;
        *day_of_week
            .entry(weekday_name(date.weekday()).to_string())
            .or_insert(0.0) += amount;
    }

    TemporalAnalysis {
        monthly: monthly
            .into_iter()
            .map(|(month, amount)| MonthlySpending { month, amount })
            .collect(),
        day_of_week,
    }
}

pub(crate) fn weekday_name(day: chrono::Weekday) -> &'static str {
    use chrono::Weekday::*;
    match day {
        Mon => "Monday",
        Tue => "Tuesday",
        Wed => "Wednesday",
        Thu => "Thursday",
        Fri => "Friday",
        Sat => "Saturday",
        Sun => "Sunday",
    }
}

fn find_anomalies(spends: &[(&SpendingRecord, f64)]) -> Vec<SpendingAnomaly> {
    // Sample standard deviation is undefined below two values
    if spends.len() < 2 {
        return Vec::new();
    }

    let n = spends.len() as f64;
    let mean = spends.iter().map(|(_, a)| a).sum::<f64>() / n;
    let variance = spends.iter().map(|(_, a)| (a - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let threshold = mean + 2.0 * variance.sqrt();

    spends
        .iter()
        .filter(|(_, amount)| *amount > threshold)
        .map(|(record, amount)| SpendingAnomaly {
            amount: *amount,
            category: category_of(record).to_string(),
            date: record.date,
            description: record.description.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn spend(amount: f64, category: &str, y: i32, m: u32, d: u32) -> SpendingRecord {
        SpendingRecord {
            amount: Some(amount),
            category: Some(category.to_string()),
            date: NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(12, 0, 0)),
            description: None,
        }
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert!(matches!(
            analyze_spending(&[]),
            Err(AnalyticsError::NoData(_))
        ));
    }

    #[test]
    fn test_missing_amounts_is_malformed() {
        let records = vec![SpendingRecord {
            amount: None,
            category: Some("food".to_string()),
            date: None,
            description: None,
        }];
        let err = analyze_spending(&records).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::MalformedInput("No valid transaction data provided".to_string())
        );
    }

    #[test]
    fn test_category_breakdown_sorted_by_sum() {
        let records = vec![
            spend(-30.0, "food", 2024, 1, 1),
            spend(-10.0, "food", 2024, 1, 2),
            spend(-60.0, "rent", 2024, 1, 3),
            spend(2000.0, "salary", 2024, 1, 4),
        ];
        let analysis = analyze_spending(&records).unwrap();

        assert_eq!(analysis.total_spending, 100.0);
        assert_eq!(analysis.transaction_count, 3);
        assert_eq!(analysis.category_analysis[0].category, "rent");
        assert_eq!(analysis.category_analysis[0].percentage, 60.0);
        assert_eq!(analysis.category_analysis[1].count, 2);
        assert_eq!(analysis.category_analysis[1].mean, 20.0);
    }

    #[test]
    fn test_temporal_breakdown() {
        let records = vec![
            // 2024-01-01 is a Monday
            spend(-10.0, "food", 2024, 1, 1),
            spend(-5.0, "food", 2024, 1, 8),
            spend(-7.0, "food", 2024, 2, 3),
        ];
        let analysis = analyze_spending(&records).unwrap();

        let monthly = &analysis.temporal_analysis.monthly;
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month, "2024-01");
        assert_eq!(monthly[0].amount, 15.0);
        assert_eq!(analysis.temporal_analysis.day_of_week["Monday"], 15.0);
        assert_eq!(analysis.temporal_analysis.day_of_week["Saturday"], 7.0);
    }

    #[test]
    fn test_outlier_detection() {
        let mut records: Vec<SpendingRecord> = (1..=10)
            .map(|d| spend(-10.0, "coffee", 2024, 3, d))
            .collect();
        records.push(spend(-500.0, "electronics", 2024, 3, 11));

        let analysis = analyze_spending(&records).unwrap();
        assert_eq!(analysis.anomalies.len(), 1);
        assert_eq!(analysis.anomalies[0].amount, 500.0);
        assert_eq!(analysis.anomalies[0].category, "electronics");
    }

    #[test]
    fn test_income_only_has_zero_spending() {
        let records = vec![spend(100.0, "salary", 2024, 1, 1)];
        let analysis = analyze_spending(&records).unwrap();
        assert_eq!(analysis.total_spending, 0.0);
        assert!(analysis.category_analysis.is_empty());
        assert!(analysis.anomalies.is_empty());
    }
}
