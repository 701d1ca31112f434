//! Goal progress rules

use super::AnalyticsError;
use crate::models::GoalStatus;

/// Status implied by a new progress value
///
/// Deferred and abandoned goals keep their status for partial progress.
pub fn status_for_progress(
    current: GoalStatus,
    progress: i32,
) -> Result<GoalStatus, AnalyticsError> {
    if !(0..=100).contains(&progress) {
        return Err(AnalyticsError::MalformedInput(
            "Progress must be between 0 and 100".to_string(),
        ));
    }

    Ok(match progress {
        0 => GoalStatus::NotStarted,
        100 => GoalStatus::Completed,
        _ if matches!(current, GoalStatus::Deferred | GoalStatus::Abandoned) => current,
        _ => GoalStatus::InProgress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bounds() {
        assert_eq!(
            status_for_progress(GoalStatus::InProgress, 0),
            Ok(GoalStatus::NotStarted)
        );
        assert_eq!(
            status_for_progress(GoalStatus::NotStarted, 100),
            Ok(GoalStatus::Completed)
        );
        assert_eq!(
            status_for_progress(GoalStatus::NotStarted, 40),
            Ok(GoalStatus::InProgress)
        );
    }

    #[test]
    fn test_paused_goals_keep_status() {
        assert_eq!(
            status_for_progress(GoalStatus::Deferred, 50),
            Ok(GoalStatus::Deferred)
        );
        assert_eq!(
            status_for_progress(GoalStatus::Abandoned, 100),
            Ok(GoalStatus::Completed)
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = status_for_progress(GoalStatus::NotStarted, 101).unwrap_err();
        assert_eq!(err.to_string(), "Progress must be between 0 and 100");
        assert!(status_for_progress(GoalStatus::NotStarted, -1).is_err());
    }
}
