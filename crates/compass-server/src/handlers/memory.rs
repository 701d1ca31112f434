//! Reminder, contact, and gift-idea handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use chrono::NaiveDateTime;
use serde::Deserialize;

use super::{now, read_json};
use crate::{audit_user, AppError, AppState};
use compass_core::analytics::birthdays::upcoming_birthdays as birthdays_within;
use compass_core::db::{GiftIdeaFilter, ReminderFilter};
use compass_core::models::{
    Contact, GiftIdea, NewContact, NewGiftIdea, NewReminder, Priority, Relationship, Reminder,
    ReminderType,
};

const DEFAULT_REMINDER_DAYS: i64 = 7;
const DEFAULT_BIRTHDAY_DAYS: i64 = 30;

/// Query parameters for listing reminders
#[derive(Debug, Deserialize)]
pub struct ReminderQuery {
    pub priority: Option<Priority>,
    pub reminder_type: Option<ReminderType>,
    pub due_before: Option<NaiveDateTime>,
    pub due_after: Option<NaiveDateTime>,
}

/// Look-ahead window in days
#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    pub relationship: Option<Relationship>,
    /// Case-insensitive name fragment
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GiftIdeaQuery {
    pub contact_id: Option<i64>,
    pub occasion: Option<String>,
    pub max_price: Option<f64>,
}

/// POST /api/memory/reminders - Create a reminder
pub async fn create_reminder(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Reminder>, AppError> {
    let user = audit_user(request.headers());
    let req: NewReminder = read_json(request).await?;

    let reminder = state.db.create_reminder(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("reminder"),
        Some(reminder.id),
        Some(&format!(
            "type={}, due={}",
            reminder.reminder_type, reminder.due_date
        )),
    )?;

    Ok(Json(reminder))
}

/// GET /api/memory/reminders - List reminders
pub async fn list_reminders(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReminderQuery>,
    request: Request,
) -> Result<Json<Vec<Reminder>>, AppError> {
    let user = audit_user(request.headers());

    let reminders = state.db.list_reminders(&ReminderFilter {
        priority: params.priority,
        reminder_type: params.reminder_type,
        due_before: params.due_before,
        due_after: params.due_after,
    })?;

    state.db.log_audit(
        &user,
        "list",
        Some("reminder"),
        None,
        Some(&format!("count={}", reminders.len())),
    )?;

    Ok(Json(reminders))
}

/// GET /api/memory/reminders/upcoming - Reminders due in the next `days` (default 7)
pub async fn upcoming_reminders(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DaysQuery>,
    request: Request,
) -> Result<Json<Vec<Reminder>>, AppError> {
    let user = audit_user(request.headers());
    let days = params.days.unwrap_or(DEFAULT_REMINDER_DAYS).max(0);

    let reminders = state.db.upcoming_reminders(now(), days)?;

    state.db.log_audit(
        &user,
        "list",
        Some("reminder"),
        None,
        Some(&format!("upcoming days={}, count={}", days, reminders.len())),
    )?;

    Ok(Json(reminders))
}

/// GET /api/memory/reminders/:id - Get a single reminder
pub async fn get_reminder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Reminder>, AppError> {
    let user = audit_user(request.headers());

    let reminder = state
        .db
        .get_reminder(id)?
        .ok_or_else(|| AppError::not_found(&format!("Reminder {} not found", id)))?;

    state
        .db
        .log_audit(&user, "get", Some("reminder"), Some(id), None)?;

    Ok(Json(reminder))
}

/// POST /api/memory/contacts - Create a contact
pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Contact>, AppError> {
    let user = audit_user(request.headers());
    let req: NewContact = read_json(request).await?;

    let contact = state.db.create_contact(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("contact"),
        Some(contact.id),
        Some(&format!("relationship={}", contact.relationship)),
    )?;

    Ok(Json(contact))
}

/// GET /api/memory/contacts - List contacts
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ContactQuery>,
    request: Request,
) -> Result<Json<Vec<Contact>>, AppError> {
    let user = audit_user(request.headers());

    let contacts = state
        .db
        .list_contacts(params.relationship, params.search.as_deref())?;

    state.db.log_audit(
        &user,
        "list",
        Some("contact"),
        None,
        Some(&format!("count={}", contacts.len())),
    )?;

    Ok(Json(contacts))
}

/// GET /api/memory/contacts/:id - Get a single contact
pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Contact>, AppError> {
    let user = audit_user(request.headers());

    let contact = state
        .db
        .get_contact(id)?
        .ok_or_else(|| AppError::not_found(&format!("Contact {} not found", id)))?;

    state
        .db
        .log_audit(&user, "get", Some("contact"), Some(id), None)?;

    Ok(Json(contact))
}

/// GET /api/memory/contacts/birthdays/upcoming - Birthdays in the next `days` (default 30)
pub async fn upcoming_birthdays(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DaysQuery>,
    request: Request,
) -> Result<Json<Vec<Contact>>, AppError> {
    let user = audit_user(request.headers());
    let days = params.days.unwrap_or(DEFAULT_BIRTHDAY_DAYS).max(0);

    let contacts = state.db.list_contacts(None, None)?;
    let upcoming = birthdays_within(&contacts, days, now().date());

    state.db.log_audit(
        &user,
        "list",
        Some("contact"),
        None,
        Some(&format!("birthdays days={}, count={}", days, upcoming.len())),
    )?;

    Ok(Json(upcoming))
}

/// POST /api/memory/gift-ideas - Record a gift idea for a contact
pub async fn create_gift_idea(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<GiftIdea>, AppError> {
    let user = audit_user(request.headers());
    let req: NewGiftIdea = read_json(request).await?;

    let gift = state.db.create_gift_idea(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("gift_idea"),
        Some(gift.id),
        Some(&format!("contact_id={}", gift.contact_id)),
    )?;

    Ok(Json(gift))
}

/// GET /api/memory/gift-ideas - List gift ideas
pub async fn list_gift_ideas(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GiftIdeaQuery>,
    request: Request,
) -> Result<Json<Vec<GiftIdea>>, AppError> {
    let user = audit_user(request.headers());

    let gifts = state.db.list_gift_ideas(&GiftIdeaFilter {
        contact_id: params.contact_id,
        occasion: params.occasion,
        max_price: params.max_price,
    })?;

    state.db.log_audit(
        &user,
        "list",
        Some("gift_idea"),
        None,
        Some(&format!("count={}", gifts.len())),
    )?;

    Ok(Json(gifts))
}
