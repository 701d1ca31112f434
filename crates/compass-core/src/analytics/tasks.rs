//! Task completion statistics

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::round_to;
use crate::models::{Task, TaskStatus};

const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionStats {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total_tasks_created: usize,
    pub total_tasks_completed: usize,
    /// Completed over created, 1 decimal; 0 when nothing was created
    pub completion_rate_percentage: f64,
    /// Mean created-to-completed time, 1 decimal
    pub average_completion_time_hours: f64,
    pub completed_by_category: BTreeMap<String, usize>,
}

fn within(at: NaiveDateTime, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    at >= start && at <= end
}

/// Count tasks created in the window against tasks completed in it
///
/// The two sets are independent: a task created before the window but
/// completed inside it still counts as completed.
pub fn completion_stats(
    tasks: &[Task],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> CompletionStats {
    let created = tasks
        .iter()
        .filter(|t| within(t.created_at, start, end))
        .count();

    let completed: Vec<(&Task, NaiveDateTime)> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .filter_map(|t| t.completion_date.map(|done| (t, done)))
        .filter(|(_, done)| within(*done, start, end))
        .collect();

    let rate = if created > 0 {
        completed.len() as f64 / created as f64 * 100.0
    } else {
        0.0
    };

    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    for (task, _) in &completed {
        let category = task.category.as_deref().unwrap_or(UNCATEGORIZED);
        *by_category.entry(category.to_string()).or_insert(0) += 1;
    }

    let hours: Vec<f64> = completed
        .iter()
        .map(|(task, done)| (*done - task.created_at).num_seconds() as f64 / 3600.0)
        .collect();
    let average_hours = if hours.is_empty() {
        0.0
    } else {
        hours.iter().sum::<f64>() / hours.len() as f64
    };

    CompletionStats {
        start_date: start,
        end_date: end,
        total_tasks_created: created,
        total_tasks_completed: completed.len(),
        completion_rate_percentage: round_to(rate, 1),
        average_completion_time_hours: round_to(average_hours, 1),
        completed_by_category: by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn task(
        created: NaiveDateTime,
        completed: Option<NaiveDateTime>,
        category: Option<&str>,
    ) -> Task {
        Task {
            id: 0,
            title: "t".to_string(),
            description: None,
            due_date: None,
            created_at: created,
            updated_at: created,
            estimated_duration_minutes: None,
            priority: Default::default(),
            status: if completed.is_some() {
                TaskStatus::Completed
            } else {
                TaskStatus::NotStarted
            },
            category: category.map(str::to_string),
            delegatable: false,
            completion_date: completed,
        }
    }

    #[test]
    fn test_rate_and_mean_time() {
        let tasks = vec![
            task(at(10, 9), Some(at(10, 12)), Some("work")),
            task(at(11, 9), Some(at(12, 9)), None),
            task(at(12, 9), None, Some("home")),
        ];
        let stats = completion_stats(&tasks, at(9, 0), at(15, 0));

        assert_eq!(stats.total_tasks_created, 3);
        assert_eq!(stats.total_tasks_completed, 2);
        assert_eq!(stats.completion_rate_percentage, 66.7);
        // (3 + 24) / 2
        assert_eq!(stats.average_completion_time_hours, 13.5);
        assert_eq!(stats.completed_by_category["work"], 1);
        assert_eq!(stats.completed_by_category["uncategorized"], 1);
    }

    #[test]
    fn test_empty_window() {
        let stats = completion_stats(&[], at(1, 0), at(1, 0) + Duration::days(7));
        assert_eq!(stats.completion_rate_percentage, 0.0);
        assert_eq!(stats.average_completion_time_hours, 0.0);
        assert!(stats.completed_by_category.is_empty());
    }

    #[test]
    fn test_completion_outside_window_ignored() {
        let tasks = vec![task(at(1, 0), Some(at(2, 0)), None)];
        let stats = completion_stats(&tasks, at(10, 0), at(20, 0));
        assert_eq!(stats.total_tasks_created, 0);
        assert_eq!(stats.total_tasks_completed, 0);
    }
}
