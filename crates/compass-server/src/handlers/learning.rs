//! Study session handlers, learning advisors, and free-text analysis

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{now, read_json};
use crate::{audit_user, AppError, AppState};
use compass_core::advisors::{Assessment, KnowledgeGapReport, LearningReport, RetentionPlan};
use compass_core::analytics::{review_schedule, AnalyticsError, ReviewSession};
use compass_core::Narrative;
use compass_core::models::{NewStudySession, StudySession};

const DEFAULT_REVIEW_CONCEPTS: u32 = 5;

#[derive(Debug, Deserialize)]
pub struct StudySessionQuery {
    pub topic: Option<String>,
    pub since: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewScheduleQuery {
    pub concepts: Option<u32>,
}

/// POST /api/learning/sessions - Record a study session
pub async fn create_study_session(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<StudySession>, AppError> {
    let user = audit_user(request.headers());
    let req: NewStudySession = read_json(request).await?;

    let session = state.db.create_study_session(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("study_session"),
        Some(session.id),
        Some(&format!(
            "type={}, minutes={}",
            session.session_type, session.duration
        )),
    )?;

    Ok(Json(session))
}

/// GET /api/learning/sessions - List study sessions in order
pub async fn list_study_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StudySessionQuery>,
    request: Request,
) -> Result<Json<Vec<StudySession>>, AppError> {
    let user = audit_user(request.headers());

    let sessions = state
        .db
        .list_study_sessions(params.topic.as_deref(), params.since)?;

    state.db.log_audit(
        &user,
        "list",
        Some("study_session"),
        None,
        Some(&format!("count={}", sessions.len())),
    )?;

    Ok(Json(sessions))
}

/// GET /api/learning/analysis - Learning style, performance, and study advice
pub async fn learning_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StudySessionQuery>,
    request: Request,
) -> Result<Json<LearningReport>, AppError> {
    let user = audit_user(request.headers());

    let sessions = state
        .db
        .list_study_sessions(params.topic.as_deref(), params.since)?;
    let report = state.learning.analyze_learning_patterns(&sessions).await;

    state.db.log_audit(
        &user,
        "analyze",
        Some("learning"),
        None,
        Some(&format!("sessions={}", sessions.len())),
    )?;

    Ok(Json(report))
}

/// GET /api/learning/review-schedule - Spaced-repetition reviews from now
pub async fn learning_review_schedule(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReviewScheduleQuery>,
    request: Request,
) -> Result<Json<Vec<ReviewSession>>, AppError> {
    let user = audit_user(request.headers());
    let concepts = params.concepts.unwrap_or(DEFAULT_REVIEW_CONCEPTS);

    let schedule = review_schedule(concepts, now());

    state.db.log_audit(
        &user,
        "analyze",
        Some("review_schedule"),
        None,
        Some(&format!("concepts={}", concepts)),
    )?;

    Ok(Json(schedule))
}

#[derive(Debug, Deserialize)]
pub struct RetentionRequest {
    pub topic: String,
    pub content: String,
}

/// POST /api/learning/retention - Key concepts, questions, and a review plan for material
pub async fn retention_plan(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<RetentionPlan>, AppError> {
    let user = audit_user(request.headers());
    let req: RetentionRequest = read_json(request).await?;

    if req.content.trim().is_empty() {
        return Err(AppError::bad_request("content must not be empty"));
    }

    let plan = state
        .learning
        .optimize_retention(&req.topic, &req.content)
        .await;

    state.db.log_audit(
        &user,
        "analyze",
        Some("retention"),
        None,
        Some(&format!("topic={}", req.topic)),
    )?;

    Ok(Json(plan))
}

#[derive(Debug, Deserialize)]
pub struct KnowledgeGapRequest {
    pub topic: String,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
}

/// POST /api/learning/knowledge-gaps - Weak subtopics and a plan to close them
pub async fn knowledge_gaps(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<KnowledgeGapReport>, AppError> {
    let user = audit_user(request.headers());
    let req: KnowledgeGapRequest = read_json(request).await?;

    let report = state
        .learning
        .analyze_knowledge_gaps(&req.topic, &req.assessments)
        .await;

    state.db.log_audit(
        &user,
        "analyze",
        Some("knowledge_gaps"),
        None,
        Some(&format!(
            "topic={}, gaps={}",
            req.topic,
            report.identified_gaps.len()
        )),
    )?;

    Ok(Json(report))
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnalysisType {
    Sentiment,
    Keywords,
    Summary,
}

#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    pub text: String,
    pub analysis_type: TextAnalysisType,
}

#[derive(Debug, Serialize)]
pub struct TextAnalysisResponse {
    pub analysis_type: TextAnalysisType,
    pub result: Narrative<Value>,
}

/// Keep a parsed reply, or substitute `fallback` when the completion service
/// is missing or replies badly
fn fall_back_on_upstream<T: Serialize>(
    outcome: Result<T, AnalyticsError>,
    fallback: Value,
) -> Result<Narrative<Value>, AppError> {
    match outcome {
        Ok(value) => Ok(Narrative::generated(serde_json::to_value(value)?)),
        Err(AnalyticsError::Upstream(reason)) => {
            warn!(error = %reason, "Text analysis fell back");
            Ok(Narrative::fallback(fallback, reason))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /api/text/analyze - Sentiment, keywords, or a summary of free text
///
/// A completion failure still answers 200, with `result.source = "fallback"`.
pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<TextAnalysisResponse>, AppError> {
    let user = audit_user(request.headers());
    let req: TextAnalysisRequest = read_json(request).await?;

    state.db.log_audit(
        &user,
        "analyze",
        Some("text"),
        None,
        Some(&format!(
            "type={:?}, chars={}",
            req.analysis_type,
            req.text.chars().count()
        )),
    )?;

    let result = match req.analysis_type {
        TextAnalysisType::Sentiment => {
            let outcome = state.text.sentiment(&req.text).await;
            fall_back_on_upstream(outcome, Value::Null)?
        }
        TextAnalysisType::Keywords => {
            let outcome = state.text.keywords(&req.text).await;
            fall_back_on_upstream(outcome, Value::Array(Vec::new()))?
        }
        TextAnalysisType::Summary => {
            let outcome = state.text.summary(&req.text).await;
            fall_back_on_upstream(outcome, Value::String(String::new()))?
        }
    };

    Ok(Json(TextAnalysisResponse {
        analysis_type: req.analysis_type,
        result,
    }))
}
