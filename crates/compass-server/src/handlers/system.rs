//! Liveness and server information handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::Serialize;

use crate::{audit_user, AppError, AppState};
use compass_core::ai::CompletionBackend;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct CompletionServiceInfo {
    pub configured: bool,
    pub available: bool,
    pub host: Option<String>,
    pub model: Option<String>,
}

#[derive(Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub encrypted: bool,
    pub auth_required: bool,
    pub completion_service: CompletionServiceInfo,
}

/// GET /api/info - Server, storage, and completion-service status
pub async fn info(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<InfoResponse>, AppError> {
    let user = audit_user(request.headers());

    let completion_service = match &state.ai {
        Some(client) => CompletionServiceInfo {
            configured: true,
            available: client.health_check().await,
            host: Some(client.host().to_string()),
            model: Some(client.model().to_string()),
        },
        None => CompletionServiceInfo {
            configured: false,
            available: false,
            host: None,
            model: None,
        },
    };

    let response = InfoResponse {
        name: "compass",
        version: env!("CARGO_PKG_VERSION"),
        encrypted: state.db.is_encrypted()?,
        auth_required: state.config.require_auth,
        completion_service,
    };

    state.db.log_audit(
        &user,
        "get",
        Some("info"),
        None,
        Some(&format!(
            "completion_available={}",
            response.completion_service.available
        )),
    )?;

    Ok(Json(response))
}
