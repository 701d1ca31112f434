//! Audit log handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use serde::Deserialize;

use super::page_limit;
use crate::{audit_user, AppError, AppState};
use compass_core::db::AuditFilter;
use compass_core::AuditEntry;

const DEFAULT_AUDIT_LIMIT: i64 = 100;

/// Query parameters for the audit log
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<i64>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
}

/// GET /api/audit - Recent API access, newest first
pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditQuery>,
    request: Request,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let user = audit_user(request.headers());
    let limit = page_limit(params.limit, DEFAULT_AUDIT_LIMIT);

    let entries = state.db.list_audit_log(
        &AuditFilter {
            action: params.action,
            entity_type: params.entity_type,
            entity_id: params.entity_id,
        },
        limit,
    )?;

    // Reading the log is itself audited
    state.db.log_audit(
        &user,
        "list",
        Some("audit_log"),
        None,
        Some(&format!("limit={}, count={}", limit, entries.len())),
    )?;

    Ok(Json(entries))
}
