//! Sleep statistics against the stored sleep goal

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{round_to, AnalyticsError};
use crate::models::SleepRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepNight {
    pub date: NaiveDateTime,
    pub duration_hours: f64,
    pub quality: i32,
    pub notes: Option<String>,
}

impl From<&SleepRecord> for SleepNight {
    fn from(record: &SleepRecord) -> Self {
        Self {
            date: record.date,
            duration_hours: record.duration_hours,
            quality: record.quality,
            notes: record.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepStats {
    pub records_count: usize,
    pub average_sleep_hours: f64,
    pub average_quality: f64,
    pub goal_hours: f64,
    pub goal_achievement_percentage: f64,
    pub best_sleep: SleepNight,
    pub worst_sleep: SleepNight,
}

/// Averages and extremes for a window of sleep records
///
/// Ties on quality keep the earliest record for both best and worst.
pub fn sleep_stats(records: &[SleepRecord], goal_hours: f64) -> Result<SleepStats, AnalyticsError> {
    let (first, rest) = records.split_first().ok_or_else(|| {
        AnalyticsError::NoData("No sleep data available for the selected period.".to_string())
    })?;

    let count = records.len() as f64;
    let average_hours = records.iter().map(|r| r.duration_hours).sum::<f64>() / count;
    let average_quality = records.iter().map(|r| r.quality as f64).sum::<f64>() / count;
    let achievement = if goal_hours > 0.0 {
        average_hours / goal_hours * 100.0
    } else {
        0.0
    };

    let mut best = first;
    let mut worst = first;
    for record in rest {
        if record.quality > best.quality {
            best = record;
        }
        if record.quality < worst.quality {
            worst = record;
        }
    }

    Ok(SleepStats {
        records_count: records.len(),
        average_sleep_hours: round_to(average_hours, 1),
        average_quality: round_to(average_quality, 1),
        goal_hours,
        goal_achievement_percentage: round_to(achievement, 1),
        best_sleep: best.into(),
        worst_sleep: worst.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn night(day: u32, hours: f64, quality: i32) -> SleepRecord {
        SleepRecord {
            id: day as i64,
            date: NaiveDate::from_ymd_opt(2024, 2, day)
                .unwrap()
                .and_hms_opt(23, 0, 0)
                .unwrap(),
            duration_hours: hours,
            quality,
            notes: None,
        }
    }

    #[test]
    fn test_no_records() {
        let err = sleep_stats(&[], 8.0).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::NoData("No sleep data available for the selected period.".to_string())
        );
    }

    #[test]
    fn test_averages_and_extremes() {
        let records = vec![night(1, 7.0, 6), night(2, 6.0, 3), night(3, 8.0, 9)];
        let stats = sleep_stats(&records, 8.0).unwrap();

        assert_eq!(stats.records_count, 3);
        assert_eq!(stats.average_sleep_hours, 7.0);
        assert_eq!(stats.average_quality, 6.0);
        assert_eq!(stats.goal_achievement_percentage, 87.5);
        assert_eq!(stats.best_sleep.quality, 9);
        assert_eq!(stats.worst_sleep.duration_hours, 6.0);
    }

    #[test]
    fn test_zero_goal() {
        let stats = sleep_stats(&[night(1, 7.0, 5)], 0.0).unwrap();
        assert_eq!(stats.goal_achievement_percentage, 0.0);
    }
}
