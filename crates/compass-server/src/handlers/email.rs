//! Email, draft, template, and phone-call handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{now, read_json};
use crate::{audit_user, AppError, AppState};
use compass_core::advisors::{draft_context, EmailInsights, Sentiment};
use compass_core::analytics::email::{
    email_statistics as statistics_for, render_template, reply_subject, triage_email,
    EmailStatistics, EmailTriage,
};
use compass_core::db::EmailFilter;
use compass_core::models::{
    CallType, Email, EmailCategory, EmailDraft, EmailTemplate, NewEmail, NewEmailDraft,
    NewEmailTemplate, NewPhoneCall, PhoneCall,
};
use compass_core::Period;

/// Query parameters for listing emails
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub is_read: Option<bool>,
    pub starred: Option<bool>,
    pub category: Option<EmailCategory>,
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallQuery {
    pub call_type: Option<CallType>,
}

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    /// "week", "month" (default) or "year"
    pub period: Option<String>,
}

fn email_not_found(id: i64) -> AppError {
    AppError::not_found(&format!("Email {} not found", id))
}

/// POST /api/email - Store an email
pub async fn create_email(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Email>, AppError> {
    let user = audit_user(request.headers());
    let req: NewEmail = read_json(request).await?;

    let email = state.db.create_email(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("email"),
        Some(email.id),
        Some(&format!("category={}", email.category)),
    )?;

    Ok(Json(email))
}

/// GET /api/email - List emails, newest first
pub async fn list_emails(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EmailQuery>,
    request: Request,
) -> Result<Json<Vec<Email>>, AppError> {
    let user = audit_user(request.headers());

    let emails = state.db.list_emails(&EmailFilter {
        is_read: params.is_read,
        starred: params.starred,
        category: params.category,
        label: params.label,
        since: None,
    })?;

    state.db.log_audit(
        &user,
        "list",
        Some("email"),
        None,
        Some(&format!("count={}", emails.len())),
    )?;

    Ok(Json(emails))
}

/// GET /api/email/:id - Get a single email
pub async fn get_email(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Email>, AppError> {
    let user = audit_user(request.headers());

    let email = state.db.get_email(id)?.ok_or_else(|| email_not_found(id))?;

    state
        .db
        .log_audit(&user, "get", Some("email"), Some(id), None)?;

    Ok(Json(email))
}

/// POST /api/email/:id/mark-read - Mark an email read
pub async fn mark_email_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Email>, AppError> {
    let user = audit_user(request.headers());

    let email = state
        .db
        .mark_email_read(id)?
        .ok_or_else(|| email_not_found(id))?;

    state
        .db
        .log_audit(&user, "mark_read", Some("email"), Some(id), None)?;

    Ok(Json(email))
}

/// POST /api/email/:id/toggle-star - Flip an email's star
pub async fn toggle_email_star(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Email>, AppError> {
    let user = audit_user(request.headers());

    let email = state
        .db
        .toggle_email_star(id)?
        .ok_or_else(|| email_not_found(id))?;

    state.db.log_audit(
        &user,
        "toggle_star",
        Some("email"),
        Some(id),
        Some(&format!("starred={}", email.starred)),
    )?;

    Ok(Json(email))
}

/// GET /api/email/:id/insights - Summary, action items, priority, replies, and tags
pub async fn email_insights(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<EmailInsights>, AppError> {
    let user = audit_user(request.headers());

    let email = state.db.get_email(id)?.ok_or_else(|| email_not_found(id))?;
    let insights = state.email.analyze(&email).await;

    state.db.log_audit(
        &user,
        "analyze",
        Some("email"),
        Some(id),
        Some(&format!("priority={}", insights.priority.content())),
    )?;

    Ok(Json(insights))
}

/// POST /api/email/drafts - Create a draft
pub async fn create_draft(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<EmailDraft>, AppError> {
    let user = audit_user(request.headers());
    let req: NewEmailDraft = read_json(request).await?;

    let draft = state.db.create_draft(&req)?;

    state
        .db
        .log_audit(&user, "create", Some("email_draft"), Some(draft.id), None)?;

    Ok(Json(draft))
}

/// GET /api/email/drafts - List unsent drafts
pub async fn list_drafts(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<EmailDraft>>, AppError> {
    let user = audit_user(request.headers());

    let drafts = state.db.list_drafts()?;

    state.db.log_audit(
        &user,
        "list",
        Some("email_draft"),
        None,
        Some(&format!("count={}", drafts.len())),
    )?;

    Ok(Json(drafts))
}

/// PUT /api/email/drafts/:id - Replace an unsent draft
pub async fn update_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<EmailDraft>, AppError> {
    let user = audit_user(request.headers());
    let req: NewEmailDraft = read_json(request).await?;

    let draft = state.db.update_draft(id, &req)?;

    state
        .db
        .log_audit(&user, "update", Some("email_draft"), Some(id), None)?;

    Ok(Json(draft))
}

/// POST /api/email/drafts/:id/send - Send a draft, returning the stored email
pub async fn send_draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Email>, AppError> {
    let user = audit_user(request.headers());

    let email = state.db.send_draft(id)?;

    state.db.log_audit(
        &user,
        "send",
        Some("email_draft"),
        Some(id),
        Some(&format!("email_id={}", email.id)),
    )?;

    Ok(Json(email))
}

/// POST /api/email/templates - Create a template
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<EmailTemplate>, AppError> {
    let user = audit_user(request.headers());
    let req: NewEmailTemplate = read_json(request).await?;

    let template = state.db.create_template(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("email_template"),
        Some(template.id),
        Some(&format!("name={}", template.name)),
    )?;

    Ok(Json(template))
}

/// GET /api/email/templates - List templates by name
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TemplateQuery>,
    request: Request,
) -> Result<Json<Vec<EmailTemplate>>, AppError> {
    let user = audit_user(request.headers());

    let templates = state.db.list_templates(params.category.as_deref())?;

    state.db.log_audit(
        &user,
        "list",
        Some("email_template"),
        None,
        Some(&format!("count={}", templates.len())),
    )?;

    Ok(Json(templates))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeEmailRequest {
    pub email_id: i64,
}

#[derive(Debug, Serialize)]
pub struct EmailTextAnalysis {
    /// Absent when the completion service could not provide it
    pub sentiment: Option<Sentiment>,
    pub keywords: Option<Vec<String>>,
    #[serde(flatten)]
    pub triage: EmailTriage,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeEmailResponse {
    pub email_id: i64,
    pub subject: String,
    pub analysis: EmailTextAnalysis,
}

/// POST /api/email/analyze - Sentiment, keywords, and keyword triage for a stored email
pub async fn analyze_email(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AnalyzeEmailResponse>, AppError> {
    let user = audit_user(request.headers());
    let req: AnalyzeEmailRequest = read_json(request).await?;

    let email = state
        .db
        .get_email(req.email_id)?
        .ok_or_else(|| email_not_found(req.email_id))?;

    let sentiment = state
        .text
        .sentiment(&email.body)
        .await
        .map_err(|e| warn!(error = %e, email_id = email.id, "Sentiment unavailable"))
        .ok();
    let keywords = state
        .text
        .keywords(&email.body)
        .await
        .map_err(|e| warn!(error = %e, email_id = email.id, "Keywords unavailable"))
        .ok();
    let triage = triage_email(&email);

    state.db.log_audit(
        &user,
        "analyze",
        Some("email"),
        Some(email.id),
        Some(&format!("urgency={:?}", triage.urgency)),
    )?;

    Ok(Json(AnalyzeEmailResponse {
        email_id: email.id,
        subject: email.subject,
        analysis: EmailTextAnalysis {
            sentiment,
            keywords,
            triage,
        },
    }))
}

/// Draft generation: reply to an email, fill a template, or write from a topic
#[derive(Debug, Deserialize)]
pub struct GenerateDraftRequest {
    #[serde(default)]
    pub email_id: Option<i64>,
    #[serde(default)]
    pub template_id: Option<i64>,
    #[serde(default)]
    pub template_variables: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Extra context for generated text
    #[serde(default)]
    pub context: Option<String>,
}

/// Template variable values as plain text
fn variable_text(variables: &HashMap<String, serde_json::Value>) -> HashMap<String, String> {
    variables
        .iter()
        .map(|(name, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.clone(), text)
        })
        .collect()
}

/// POST /api/email/generate-draft - Create a draft from an email, a template, or a topic
pub async fn generate_draft(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<EmailDraft>, AppError> {
    let user = audit_user(request.headers());
    let req: GenerateDraftRequest = read_json(request).await?;

    let (subject, body, recipients, source) = if let Some(email_id) = req.email_id {
        let email = state
            .db
            .get_email(email_id)?
            .ok_or_else(|| email_not_found(email_id))?;
        let context = draft_context(&[
            ("original_email", Some(email.body.as_str())),
            ("original_subject", Some(email.subject.as_str())),
            ("sender", email.sender.as_deref()),
            ("additional_context", req.context.as_deref()),
        ])?;
        let body = state
            .email
            .generate_response(&context, "email_reply")
            .await
            .into_content();
        let recipients: Vec<String> = email.sender.clone().into_iter().collect();
        (reply_subject(&email.subject), body, recipients, "reply")
    } else if let Some(template_id) = req.template_id {
        let template = state
            .db
            .get_template(template_id)?
            .ok_or_else(|| AppError::not_found(&format!("Template {} not found", template_id)))?;
        let variables = variable_text(&req.template_variables);
        (
            render_template(&template.subject, &variables)?,
            render_template(&template.body, &variables)?,
            req.recipients,
            "template",
        )
    } else if let (Some(subject), Some(topic)) = (req.subject, req.context) {
        let context = draft_context(&[
            ("subject", Some(subject.as_str())),
            ("topic", Some(topic.as_str())),
        ])?;
        let body = state
            .email
            .generate_response(&context, "email_generation")
            .await
            .into_content();
        (subject, body, req.recipients, "generated")
    } else {
        return Err(AppError::bad_request(
            "Must provide either email_id, template_id, or subject and context",
        ));
    };

    let draft = state.db.create_draft(&NewEmailDraft {
        subject,
        body,
        recipients,
        cc: Vec::new(),
        bcc: Vec::new(),
        in_reply_to: req.email_id,
    })?;

    state.db.log_audit(
        &user,
        "generate",
        Some("email_draft"),
        Some(draft.id),
        Some(&format!("source={}", source)),
    )?;

    Ok(Json(draft))
}

/// POST /api/email/calls - Record a phone call
pub async fn create_phone_call(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<PhoneCall>, AppError> {
    let user = audit_user(request.headers());
    let req: NewPhoneCall = read_json(request).await?;

    let call = state.db.create_phone_call(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("phone_call"),
        Some(call.id),
        Some(&format!("type={}", call.call_type)),
    )?;

    Ok(Json(call))
}

/// GET /api/email/calls - List phone calls, newest first
pub async fn list_phone_calls(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallQuery>,
    request: Request,
) -> Result<Json<Vec<PhoneCall>>, AppError> {
    let user = audit_user(request.headers());

    let calls = state.db.list_phone_calls(params.call_type)?;

    state.db.log_audit(
        &user,
        "list",
        Some("phone_call"),
        None,
        Some(&format!("count={}", calls.len())),
    )?;

    Ok(Json(calls))
}

/// GET /api/email/statistics - Email counts for the period (default month)
pub async fn email_statistics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatisticsQuery>,
    request: Request,
) -> Result<Json<EmailStatistics>, AppError> {
    let user = audit_user(request.headers());
    let period = params
        .period
        .as_deref()
        .map(Period::parse_or_month)
        .unwrap_or(Period::Month);

    let now = now();
    let (start, _) = period.window_ending(now);
    let emails = state.db.list_emails(&EmailFilter {
        since: Some(start),
        ..Default::default()
    })?;
    let stats = statistics_for(&emails, period, now);

    state.db.log_audit(
        &user,
        "analyze",
        Some("email_statistics"),
        None,
        Some(&format!("period={}, total={}", period.as_str(), stats.total_emails)),
    )?;

    Ok(Json(stats))
}
