//! Sleep, exercise, and health preference handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use chrono::NaiveDateTime;
use serde::Deserialize;

use super::{read_json, AnalysisWindowQuery, Windowed};
use crate::{audit_user, AppError, AppState};
use compass_core::analytics::sleep::{sleep_stats, SleepStats};
use compass_core::models::{
    ExerciseRecord, HealthPreferences, HealthPreferencesUpdate, NewExerciseRecord,
    NewSleepRecord, SleepRecord,
};

/// Query parameters for listing health records
#[derive(Debug, Deserialize)]
pub struct HealthRecordQuery {
    #[serde(alias = "start")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(alias = "end")]
    pub end_date: Option<NaiveDateTime>,
    /// Exercise only
    pub activity_type: Option<String>,
}

/// POST /api/health/sleep - Record a night of sleep
pub async fn create_sleep_record(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<SleepRecord>, AppError> {
    let user = audit_user(request.headers());
    let req: NewSleepRecord = read_json(request).await?;

    let record = state.db.create_sleep_record(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("sleep_record"),
        Some(record.id),
        Some(&format!(
            "hours={}, quality={}",
            record.duration_hours, record.quality
        )),
    )?;

    Ok(Json(record))
}

/// GET /api/health/sleep - List sleep records
pub async fn list_sleep_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HealthRecordQuery>,
    request: Request,
) -> Result<Json<Vec<SleepRecord>>, AppError> {
    let user = audit_user(request.headers());

    let records = state
        .db
        .list_sleep_records(params.start_date, params.end_date)?;

    state.db.log_audit(
        &user,
        "list",
        Some("sleep_record"),
        None,
        Some(&format!("count={}", records.len())),
    )?;

    Ok(Json(records))
}

/// POST /api/health/exercise - Record a workout
pub async fn create_exercise_record(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ExerciseRecord>, AppError> {
    let user = audit_user(request.headers());
    let req: NewExerciseRecord = read_json(request).await?;

    let record = state.db.create_exercise_record(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("exercise_record"),
        Some(record.id),
        Some(&format!(
            "type={}, minutes={}",
            record.activity_type, record.duration_minutes
        )),
    )?;

    Ok(Json(record))
}

/// GET /api/health/exercise - List exercise records
pub async fn list_exercise_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HealthRecordQuery>,
    request: Request,
) -> Result<Json<Vec<ExerciseRecord>>, AppError> {
    let user = audit_user(request.headers());

    let records = state.db.list_exercise_records(
        params.start_date,
        params.end_date,
        params.activity_type.as_deref(),
    )?;

    state.db.log_audit(
        &user,
        "list",
        Some("exercise_record"),
        None,
        Some(&format!("count={}", records.len())),
    )?;

    Ok(Json(records))
}

/// GET /api/health/preferences - Current health goals
pub async fn get_health_preferences(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<HealthPreferences>, AppError> {
    let user = audit_user(request.headers());

    let prefs = state.db.get_health_preferences()?;

    state
        .db
        .log_audit(&user, "get", Some("health_preferences"), None, None)?;

    Ok(Json(prefs))
}

/// PUT /api/health/preferences - Update health goals
pub async fn update_health_preferences(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<HealthPreferences>, AppError> {
    let user = audit_user(request.headers());
    let req: HealthPreferencesUpdate = read_json(request).await?;

    let prefs = state.db.update_health_preferences(&req)?;

    state.db.log_audit(
        &user,
        "update",
        Some("health_preferences"),
        None,
        Some(&format!("sleep_goal_hours={}", prefs.sleep_goal_hours)),
    )?;

    Ok(Json(prefs))
}

/// GET /api/health/analysis/sleep - Sleep statistics against the sleep goal
pub async fn sleep_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalysisWindowQuery>,
    request: Request,
) -> Result<Json<Windowed<SleepStats>>, AppError> {
    let user = audit_user(request.headers());
    let (period, start, end) = params.resolve();

    let records = state.db.list_sleep_records(Some(start), Some(end))?;
    let goal = state.db.get_health_preferences()?.sleep_goal_hours;

    state.db.log_audit(
        &user,
        "analyze",
        Some("sleep"),
        None,
        Some(&format!("period={}, records={}", period.as_str(), records.len())),
    )?;

    let analysis = sleep_stats(&records, goal)?;

    Ok(Json(Windowed {
        period,
        start_date: start,
        end_date: end,
        analysis,
    }))
}
