//! Task handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{now, read_json, AnalysisWindowQuery};
use crate::{audit_user, AppError, AppState, SuccessResponse};
use compass_core::analytics::tasks::{completion_stats, CompletionStats};
use compass_core::models::{NewTask, Priority, Task, TaskStatus, TaskUpdate};
use compass_core::Period;

/// Query parameters for listing tasks
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
}

/// POST /api/tasks - Create a task
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Task>, AppError> {
    let user = audit_user(request.headers());
    let req: NewTask = read_json(request).await?;

    let task = state.db.create_task(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("task"),
        Some(task.id),
        Some(&format!("title={}, priority={}", task.title, task.priority)),
    )?;

    Ok(Json(task))
}

/// GET /api/tasks - List tasks
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TaskQuery>,
    request: Request,
) -> Result<Json<Vec<Task>>, AppError> {
    let user = audit_user(request.headers());

    let tasks = state
        .db
        .list_tasks(params.status, params.priority, params.category.as_deref())?;

    state.db.log_audit(
        &user,
        "list",
        Some("task"),
        None,
        Some(&format!("count={}", tasks.len())),
    )?;

    Ok(Json(tasks))
}

/// GET /api/tasks/today - Open tasks due today or undated, most urgent first
pub async fn tasks_today(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Task>>, AppError> {
    let user = audit_user(request.headers());

    let tasks = state.db.tasks_for_today(now())?;

    state.db.log_audit(
        &user,
        "list",
        Some("task"),
        None,
        Some(&format!("today, count={}", tasks.len())),
    )?;

    Ok(Json(tasks))
}

/// GET /api/tasks/:id - Get a single task
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Task>, AppError> {
    let user = audit_user(request.headers());

    let task = state
        .db
        .get_task(id)?
        .ok_or_else(|| AppError::not_found(&format!("Task {} not found", id)))?;

    state
        .db
        .log_audit(&user, "get", Some("task"), Some(id), None)?;

    Ok(Json(task))
}

/// PUT /api/tasks/:id - Partially update a task
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Task>, AppError> {
    let user = audit_user(request.headers());
    let req: TaskUpdate = read_json(request).await?;

    let task = state
        .db
        .update_task(id, &req)?
        .ok_or_else(|| AppError::not_found(&format!("Task {} not found", id)))?;

    state.db.log_audit(
        &user,
        "update",
        Some("task"),
        Some(id),
        Some(&format!("status={}", task.status)),
    )?;

    Ok(Json(task))
}

/// DELETE /api/tasks/:id - Delete a task
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = audit_user(request.headers());

    if !state.db.delete_task(id)? {
        return Err(AppError::not_found(&format!("Task {} not found", id)));
    }

    state
        .db
        .log_audit(&user, "delete", Some("task"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/tasks/:id/complete - Mark a task completed
pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Task>, AppError> {
    let user = audit_user(request.headers());

    let task = state
        .db
        .complete_task(id)?
        .ok_or_else(|| AppError::not_found(&format!("Task {} not found", id)))?;

    state
        .db
        .log_audit(&user, "complete", Some("task"), Some(id), None)?;

    Ok(Json(task))
}

#[derive(Debug, Serialize)]
pub struct CompletionAnalysis {
    pub period: Period,
    #[serde(flatten)]
    pub stats: CompletionStats,
}

/// GET /api/tasks/analysis/completion - Created vs completed tasks in a window
pub async fn task_completion_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalysisWindowQuery>,
    request: Request,
) -> Result<Json<CompletionAnalysis>, AppError> {
    let user = audit_user(request.headers());
    let (period, start, end) = params.resolve();

    let tasks = state.db.tasks_touched_since(start)?;
    let stats = completion_stats(&tasks, start, end);

    state.db.log_audit(
        &user,
        "analyze",
        Some("task_completion"),
        None,
        Some(&format!(
            "period={}, completed={}",
            period.as_str(),
            stats.total_tasks_completed
        )),
    )?;

    Ok(Json(CompletionAnalysis { period, stats }))
}
