//! Me-time scheduling

use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::Serialize;

use super::spending::weekday_name;
use super::{check_horizon, AnalyticsError, MAX_DAYS_AHEAD};
use crate::models::MeTime;

pub const DEFAULT_START_TIME: &str = "18:00";
pub const DEFAULT_DAYS_AHEAD: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledMeTime {
    /// "YYYY-MM-DD"
    pub date: String,
    pub weekday: &'static str,
    pub activity_id: i64,
    pub title: String,
    /// "HH:MM"
    pub start_time: String,
    pub duration_minutes: i32,
    pub location: Option<String>,
}

/// Pick one activity per day for `days_ahead` days starting at `today`
///
/// An activity fits a day when it lists no preferred days or lists that
/// weekday (0 = Monday). Highest priority wins; ties keep input order. Days
/// with no fitting activity are skipped. More than [`MAX_DAYS_AHEAD`] days is
/// `MalformedInput`.
pub fn me_time_schedule(
    activities: &[MeTime],
    days_ahead: u32,
    today: NaiveDate,
) -> Result<Vec<ScheduledMeTime>, AnalyticsError> {
    check_horizon(days_ahead as i64, MAX_DAYS_AHEAD, "days")?;

    let mut schedule = Vec::new();
    for offset in 0..days_ahead {
        let date = TimeDelta::try_days(offset as i64)
            .and_then(|delta| today.checked_add_signed(delta))
            .ok_or_else(|| {
                AnalyticsError::MalformedInput("Schedule runs past the calendar".to_string())
            })?;
        if let Some(slot) = pick_for_day(activities, date) {
            schedule.push(slot);
        }
    }
    Ok(schedule)
}

fn pick_for_day(activities: &[MeTime], date: NaiveDate) -> Option<ScheduledMeTime> {
    let weekday = date.weekday();
    let index = weekday.num_days_from_monday();

    let mut best: Option<&MeTime> = None;
    for activity in activities
        .iter()
        .filter(|a| a.preferred_days.is_empty() || a.preferred_days.contains(&index))
    {
        if best.map_or(true, |b| activity.priority > b.priority) {
            best = Some(activity);
        }
    }

    best.map(|activity| ScheduledMeTime {
        date: date.format("%Y-%m-%d").to_string(),
        weekday: weekday_name(weekday),
        activity_id: activity.id,
        title: activity.title.clone(),
        start_time: activity
            .preferred_time_ranges
            .first()
            .map(|range| range.start.clone())
            .unwrap_or_else(|| DEFAULT_START_TIME.to_string()),
        duration_minutes: activity.duration_minutes,
        location: activity.location.clone(),
    })
}
