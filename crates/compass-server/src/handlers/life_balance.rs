//! Life area, goal, reward, me-time, and activity handlers plus balance analysis

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{now, read_json};
use crate::{audit_user, AppError, AppState};
use compass_core::advisors::{BalanceReport, Narrative, ScheduleChange, ScheduleItem};
use compass_core::analytics::life_balance::TimedActivity;
use compass_core::analytics::me_time::{
    me_time_schedule as schedule_me_time, ScheduledMeTime, DEFAULT_DAYS_AHEAD,
};
use compass_core::analytics::wheel::{
    area_burnout_risk, wheel_of_life as wheel_for, AreaBurnoutRisk, WheelOfLife,
    GOAL_OVERLOAD_WINDOW_DAYS,
};
use compass_core::db::GoalFilter;
use compass_core::models::{
    Activity, Goal, GoalPriority, GoalStatus, GoalUpdate, LifeArea, LifeAreaType, MeTime,
    NewActivity, NewGoal, NewLifeArea, NewMeTime, NewReward, Reward, RewardType,
};
use compass_core::Period;

#[derive(Debug, Deserialize)]
pub struct GoalQuery {
    pub status: Option<GoalStatus>,
    pub life_area: Option<LifeAreaType>,
    pub priority: Option<GoalPriority>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    /// 0-100
    pub progress: i32,
}

#[derive(Debug, Deserialize)]
pub struct RewardQuery {
    pub reward_type: Option<RewardType>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub days_ahead: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub since: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// "week" (default), "month" or "year"
    pub timeframe: Option<String>,
}

/// POST /api/life-balance/areas - Rate a life area
pub async fn create_life_area(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<LifeArea>, AppError> {
    let user = audit_user(request.headers());
    let req: NewLifeArea = read_json(request).await?;

    let area = state.db.create_life_area(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("life_area"),
        Some(area.id),
        Some(&format!("type={}", area.area_type)),
    )?;

    Ok(Json(area))
}

/// GET /api/life-balance/areas - List life areas
pub async fn list_life_areas(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<LifeArea>>, AppError> {
    let user = audit_user(request.headers());

    let areas = state.db.list_life_areas()?;

    state.db.log_audit(
        &user,
        "list",
        Some("life_area"),
        None,
        Some(&format!("count={}", areas.len())),
    )?;

    Ok(Json(areas))
}

/// PUT /api/life-balance/areas/:id - Replace a life area's ratings
pub async fn update_life_area(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<LifeArea>, AppError> {
    let user = audit_user(request.headers());
    let req: NewLifeArea = read_json(request).await?;

    let area = state.db.update_life_area(id, &req)?;

    state.db.log_audit(
        &user,
        "update",
        Some("life_area"),
        Some(id),
        Some(&format!(
            "importance={}, satisfaction={}",
            area.importance, area.satisfaction
        )),
    )?;

    Ok(Json(area))
}

/// POST /api/life-balance/goals - Create a goal in an existing life area
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Goal>, AppError> {
    let user = audit_user(request.headers());
    let req: NewGoal = read_json(request).await?;

    let goal = state.db.create_goal(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("goal"),
        Some(goal.id),
        Some(&format!("area={}, priority={}", goal.life_area, goal.priority)),
    )?;

    Ok(Json(goal))
}

/// GET /api/life-balance/goals - List goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GoalQuery>,
    request: Request,
) -> Result<Json<Vec<Goal>>, AppError> {
    let user = audit_user(request.headers());

    let goals = state.db.list_goals(&GoalFilter {
        status: params.status,
        life_area: params.life_area,
        priority: params.priority,
    })?;

    state.db.log_audit(
        &user,
        "list",
        Some("goal"),
        None,
        Some(&format!("count={}", goals.len())),
    )?;

    Ok(Json(goals))
}

/// GET /api/life-balance/goals/:id - Get a single goal
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Goal>, AppError> {
    let user = audit_user(request.headers());

    let goal = state
        .db
        .get_goal(id)?
        .ok_or_else(|| AppError::not_found(&format!("Goal {} not found", id)))?;

    state
        .db
        .log_audit(&user, "get", Some("goal"), Some(id), None)?;

    Ok(Json(goal))
}

/// PUT /api/life-balance/goals/:id - Partially update a goal
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Goal>, AppError> {
    let user = audit_user(request.headers());
    let req: GoalUpdate = read_json(request).await?;

    let goal = state.db.update_goal(id, &req)?;

    state.db.log_audit(
        &user,
        "update",
        Some("goal"),
        Some(id),
        Some(&format!("status={}", goal.status)),
    )?;

    Ok(Json(goal))
}

/// POST /api/life-balance/goals/:id/progress?progress=N - Set progress, moving the status along
pub async fn update_goal_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<ProgressQuery>,
    request: Request,
) -> Result<Json<Goal>, AppError> {
    let user = audit_user(request.headers());

    let goal = state.db.update_goal_progress(id, params.progress)?;

    state.db.log_audit(
        &user,
        "progress",
        Some("goal"),
        Some(id),
        Some(&format!(
            "progress={}, status={}",
            goal.progress_percent, goal.status
        )),
    )?;

    Ok(Json(goal))
}

/// POST /api/life-balance/rewards - Create a reward
pub async fn create_reward(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Reward>, AppError> {
    let user = audit_user(request.headers());
    let req: NewReward = read_json(request).await?;

    let reward = state.db.create_reward(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("reward"),
        Some(reward.id),
        Some(&format!("type={}", reward.reward_type)),
    )?;

    Ok(Json(reward))
}

/// GET /api/life-balance/rewards - List rewards
pub async fn list_rewards(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RewardQuery>,
    request: Request,
) -> Result<Json<Vec<Reward>>, AppError> {
    let user = audit_user(request.headers());

    let rewards = state.db.list_rewards(params.reward_type)?;

    state.db.log_audit(
        &user,
        "list",
        Some("reward"),
        None,
        Some(&format!("count={}", rewards.len())),
    )?;

    Ok(Json(rewards))
}

/// POST /api/life-balance/me-time - Create a me-time activity
pub async fn create_me_time(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<MeTime>, AppError> {
    let user = audit_user(request.headers());
    let req: NewMeTime = read_json(request).await?;

    let activity = state.db.create_me_time(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("me_time"),
        Some(activity.id),
        Some(&format!("minutes={}", activity.duration_minutes)),
    )?;

    Ok(Json(activity))
}

/// GET /api/life-balance/me-time - List me-time activities, highest priority first
pub async fn list_me_time(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<MeTime>>, AppError> {
    let user = audit_user(request.headers());

    let activities = state.db.list_me_time()?;

    state.db.log_audit(
        &user,
        "list",
        Some("me_time"),
        None,
        Some(&format!("count={}", activities.len())),
    )?;

    Ok(Json(activities))
}

/// GET /api/life-balance/me-time/schedule - Place me-time on the coming days
pub async fn me_time_schedule(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScheduleQuery>,
    request: Request,
) -> Result<Json<Vec<ScheduledMeTime>>, AppError> {
    let user = audit_user(request.headers());
    let days_ahead = params.days_ahead.unwrap_or(DEFAULT_DAYS_AHEAD);

    state.db.log_audit(
        &user,
        "analyze",
        Some("me_time_schedule"),
        None,
        Some(&format!("days={}", days_ahead)),
    )?;

    let activities = state.db.list_me_time()?;
    let schedule = schedule_me_time(&activities, days_ahead, now().date())?;

    Ok(Json(schedule))
}

/// GET /api/life-balance/wheel-of-life - Weighted satisfaction across life areas
///
/// Seeds the default wheel the first time it is requested.
pub async fn wheel_of_life(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<WheelOfLife>, AppError> {
    let user = audit_user(request.headers());

    let areas = state.db.ensure_default_life_areas()?;
    let wheel = wheel_for(&areas);

    state.db.log_audit(
        &user,
        "analyze",
        Some("wheel_of_life"),
        None,
        Some(&format!("overall={}", wheel.overall_score)),
    )?;

    Ok(Json(wheel))
}

/// GET /api/life-balance/burnout-risk - Risk from area ratings and recent goal load
pub async fn burnout_risk(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AreaBurnoutRisk>, AppError> {
    let user = audit_user(request.headers());

    let areas = state.db.list_life_areas()?;
    let since = now() - Duration::days(GOAL_OVERLOAD_WINDOW_DAYS);
    let recent_goals = state.db.count_goals_created_since(since)?;
    let risk = area_burnout_risk(&areas, recent_goals);

    state.db.log_audit(
        &user,
        "analyze",
        Some("burnout_risk"),
        None,
        Some(&format!("score={}", risk.risk_score)),
    )?;

    Ok(Json(risk))
}

/// POST /api/life-balance/activities - Log time spent on an activity
pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Activity>, AppError> {
    let user = audit_user(request.headers());
    let req: NewActivity = read_json(request).await?;

    let activity = state.db.create_activity(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("activity"),
        Some(activity.id),
        Some(&format!(
            "type={}, hours={}",
            activity.activity_type, activity.duration
        )),
    )?;

    Ok(Json(activity))
}

/// GET /api/life-balance/activities - List logged activities
pub async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivityQuery>,
    request: Request,
) -> Result<Json<Vec<Activity>>, AppError> {
    let user = audit_user(request.headers());

    let activities = state.db.list_activities(params.since)?;

    state.db.log_audit(
        &user,
        "list",
        Some("activity"),
        None,
        Some(&format!("count={}", activities.len())),
    )?;

    Ok(Json(activities))
}

/// GET /api/life-balance/analysis - Domain balance and burnout over logged activities
pub async fn balance_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BalanceQuery>,
    request: Request,
) -> Result<Json<BalanceReport>, AppError> {
    let user = audit_user(request.headers());
    let period = params
        .timeframe
        .as_deref()
        .map(Period::parse_or_week)
        .unwrap_or(Period::Week);

    let (since, _) = period.window_ending(now());
    let activities: Vec<TimedActivity> = state
        .db
        .list_activities(Some(since))?
        .iter()
        .map(TimedActivity::from)
        .collect();

    let report = state
        .balance
        .analyze_balance(&activities, period.as_str())
        .await;

    state.db.log_audit(
        &user,
        "analyze",
        Some("life_balance"),
        None,
        Some(&format!(
            "timeframe={}, activities={}, score={}",
            period.as_str(),
            activities.len(),
            report.balance_score
        )),
    )?;

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct OptimizeScheduleRequest {
    pub schedule: Vec<ScheduleItem>,
    #[serde(default)]
    pub preferences: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct OptimizedSchedule {
    pub optimized_schedule: Vec<ScheduleItem>,
    pub changes: Narrative<Vec<ScheduleChange>>,
}

/// POST /api/life-balance/optimize-schedule - Suggested changes for a schedule
pub async fn optimize_schedule(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<OptimizedSchedule>, AppError> {
    let user = audit_user(request.headers());
    let req: OptimizeScheduleRequest = read_json(request).await?;

    let changes = state
        .balance
        .optimize_schedule(&req.schedule, &req.preferences)
        .await;

    state.db.log_audit(
        &user,
        "analyze",
        Some("schedule"),
        None,
        Some(&format!(
            "items={}, changes={}",
            req.schedule.len(),
            changes.content().len()
        )),
    )?;

    Ok(Json(OptimizedSchedule {
        optimized_schedule: req.schedule,
        changes,
    }))
}
