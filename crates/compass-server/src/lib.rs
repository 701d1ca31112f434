//! Compass Web Server
//!
//! Axum-based REST API for the Compass life-management backend.
//!
//! Security features:
//! - API key authentication (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Full audit logging for all API access (reads and writes)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use compass_core::ai::{AIClient, CompletionBackend};
use compass_core::analytics::AnalyticsError;
use compass_core::db::Database;
use compass_core::{EmailAssistant, LearningAdvisor, LifeBalanceAdvisor, TextAnalyzer};

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Maximum JSON request body size (256 KB)
pub const MAX_BODY_SIZE: usize = 256 * 1024;

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Comma-separated API keys accepted as bearer tokens
pub const API_KEYS_ENV: &str = "COMPASS_API_KEYS";

/// Comma-separated origins allowed by CORS
pub const CORS_ORIGINS_ENV: &str = "COMPASS_CORS_ORIGINS";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// API keys accepted as "Bearer <key>" in the Authorization header
    pub api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
        }
    }
}

impl ServerConfig {
    /// Read API keys and CORS origins from the environment
    pub fn from_env(require_auth: bool) -> Self {
        Self {
            require_auth,
            allowed_origins: std::env::var(CORS_ORIGINS_ENV)
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            api_keys: std::env::var(API_KEYS_ENV)
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
        }
    }
}

/// Split a comma-separated list, dropping blanks
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub ai: Option<AIClient>,
    pub balance: LifeBalanceAdvisor,
    pub learning: LearningAdvisor,
    pub email: EmailAssistant,
    pub text: TextAnalyzer,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig, ai: Option<AIClient>) -> Self {
        Self {
            db,
            config,
            balance: LifeBalanceAdvisor::new(ai.clone()),
            learning: LearningAdvisor::new(ai.clone()),
            email: EmailAssistant::new(ai.clone()),
            text: TextAnalyzer::new(ai.clone()),
            ai,
        }
    }
}

/// Authentication middleware - validates bearer API keys
///
/// Keys are compared in constant time.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let api_key_valid = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| validate_api_key(key, &state.config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Validate an API key against the configured keys using constant-time comparison
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();

    valid_keys.iter().any(|key| {
        let key_bytes = key.as_bytes();
        // Only compare if lengths match (constant-time for same-length keys)
        provided_bytes.len() == key_bytes.len() && bool::from(provided_bytes.ct_eq(key_bytes))
    })
}

/// Identify the caller for audit logging
/// Returns "api-key" for API key auth, or "local-dev" for unauthenticated
pub fn audit_user(headers: &axum::http::HeaderMap) -> String {
    if headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .is_some()
    {
        return "api-key".to_string();
    }

    "local-dev".to_string()
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router with the completion client from the environment
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let ai = AIClient::from_env();
    match ai {
        Some(ref client) => info!(
            host = client.host(),
            model = client.model(),
            "Completion service configured"
        ),
        None => info!(
            "Completion service not configured (set OPENAI_COMPATIBLE_HOST to enable advisors)"
        ),
    }
    create_router_with_options(db, static_dir, config, ai)
}

/// Create the application router with an explicit completion client (for testing)
pub fn create_router_with_options(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    ai: Option<AIClient>,
) -> Router {
    let state = Arc::new(AppState::new(db, config.clone(), ai));

    let api_routes = Router::new()
        // Server
        .route("/health", get(handlers::health))
        .route("/info", get(handlers::info))
        .route("/audit", get(handlers::list_audit_log))
        // Finance
        .route(
            "/finance/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/finance/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route(
            "/finance/analysis/spending",
            get(handlers::spending_analysis),
        )
        .route(
            "/finance/analysis/patterns",
            post(handlers::spending_patterns),
        )
        .route(
            "/finance/analysis/budget",
            post(handlers::budget_recommendation),
        )
        .route(
            "/finance/analysis/cash-flow",
            post(handlers::cash_flow_projection),
        )
        // Health
        .route(
            "/health/sleep",
            get(handlers::list_sleep_records).post(handlers::create_sleep_record),
        )
        .route(
            "/health/exercise",
            get(handlers::list_exercise_records).post(handlers::create_exercise_record),
        )
        .route(
            "/health/preferences",
            get(handlers::get_health_preferences).put(handlers::update_health_preferences),
        )
        .route("/health/analysis/sleep", get(handlers::sleep_analysis))
        // Tasks
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/tasks/today", get(handlers::tasks_today))
        .route(
            "/tasks/analysis/completion",
            get(handlers::task_completion_analysis),
        )
        .route(
            "/tasks/:id",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/tasks/:id/complete", post(handlers::complete_task))
        // Portfolio
        .route(
            "/portfolio/investments",
            get(handlers::list_investments).post(handlers::create_investment),
        )
        .route(
            "/portfolio/investments/:id",
            get(handlers::get_investment)
                .put(handlers::update_investment)
                .delete(handlers::delete_investment),
        )
        .route(
            "/portfolio/analysis/portfolio-allocation",
            get(handlers::portfolio_allocation_analysis),
        )
        // Memory
        .route(
            "/memory/reminders",
            get(handlers::list_reminders).post(handlers::create_reminder),
        )
        .route(
            "/memory/reminders/upcoming",
            get(handlers::upcoming_reminders),
        )
        .route("/memory/reminders/:id", get(handlers::get_reminder))
        .route(
            "/memory/contacts",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route(
            "/memory/contacts/birthdays/upcoming",
            get(handlers::upcoming_birthdays),
        )
        .route("/memory/contacts/:id", get(handlers::get_contact))
        .route(
            "/memory/gift-ideas",
            get(handlers::list_gift_ideas).post(handlers::create_gift_idea),
        )
        // Email
        .route("/email", get(handlers::list_emails).post(handlers::create_email))
        .route(
            "/email/drafts",
            get(handlers::list_drafts).post(handlers::create_draft),
        )
        .route("/email/drafts/:id", put(handlers::update_draft))
        .route("/email/drafts/:id/send", post(handlers::send_draft))
        .route(
            "/email/templates",
            get(handlers::list_templates).post(handlers::create_template),
        )
        .route("/email/analyze", post(handlers::analyze_email))
        .route("/email/generate-draft", post(handlers::generate_draft))
        .route(
            "/email/calls",
            get(handlers::list_phone_calls).post(handlers::create_phone_call),
        )
        .route("/email/statistics", get(handlers::email_statistics))
        .route("/email/:id", get(handlers::get_email))
        .route("/email/:id/mark-read", post(handlers::mark_email_read))
        .route("/email/:id/toggle-star", post(handlers::toggle_email_star))
        .route("/email/:id/insights", get(handlers::email_insights))
        // Life balance
        .route(
            "/life-balance/areas",
            get(handlers::list_life_areas).post(handlers::create_life_area),
        )
        .route("/life-balance/areas/:id", put(handlers::update_life_area))
        .route(
            "/life-balance/goals",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route(
            "/life-balance/goals/:id",
            get(handlers::get_goal).put(handlers::update_goal),
        )
        .route(
            "/life-balance/goals/:id/progress",
            post(handlers::update_goal_progress),
        )
        .route(
            "/life-balance/rewards",
            get(handlers::list_rewards).post(handlers::create_reward),
        )
        .route(
            "/life-balance/me-time",
            get(handlers::list_me_time).post(handlers::create_me_time),
        )
        .route(
            "/life-balance/me-time/schedule",
            get(handlers::me_time_schedule),
        )
        .route("/life-balance/wheel-of-life", get(handlers::wheel_of_life))
        .route("/life-balance/burnout-risk", get(handlers::burnout_risk))
        .route(
            "/life-balance/activities",
            get(handlers::list_activities).post(handlers::create_activity),
        )
        .route("/life-balance/analysis", get(handlers::balance_analysis))
        .route(
            "/life-balance/schedule/optimize",
            post(handlers::optimize_schedule),
        )
        // Learning
        .route(
            "/learning/sessions",
            get(handlers::list_study_sessions).post(handlers::create_study_session),
        )
        .route("/learning/analysis", get(handlers::learning_analysis))
        .route(
            "/learning/review-schedule",
            get(handlers::learning_review_schedule),
        )
        .route("/learning/retention", post(handlers::retention_plan))
        .route("/learning/knowledge-gaps", post(handlers::knowledge_gaps))
        .route("/text/analyze", post(handlers::analyze_text));

    // Restrictive default: only allow same-origin
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
    let cors = if config.allowed_origins.is_empty() {
        cors
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    };

    // Security headers
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("Authentication disabled - do not expose to network!");
    } else if config.api_keys.is_empty() {
        warn!(
            "Authentication required but {} is empty; every request will be rejected",
            API_KEYS_ENV
        );
    }

    check_ai_connection().await;

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log completion service status
async fn check_ai_connection() {
    match AIClient::from_env() {
        Some(client) => {
            if client.health_check().await {
                info!(host = client.host(), model = client.model(), "Completion service connected");
            } else {
                warn!(
                    host = client.host(),
                    model = client.model(),
                    "Completion service configured but not responding"
                );
            }
        }
        None => {
            info!("Completion service not configured; advisors will return fallbacks");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
///
/// An analysis with nothing to analyze is not a failure: it short-circuits
/// the handler like an error but answers 200 with `{"no_data": true}`.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    no_data: bool,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            no_data: false,
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn bad_gateway(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_GATEWAY, msg)
    }

    pub fn no_data(msg: &str) -> Self {
        Self {
            no_data: true,
            ..Self::with_status(StatusCode::OK, msg)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = if self.no_data {
            Json(serde_json::json!({
                "no_data": true,
                "message": self.message
            }))
        } else {
            Json(serde_json::json!({
                "error": self.message
            }))
        };

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Caller mistakes keep their message
        if let Some(core) = err.downcast_ref::<compass_core::Error>() {
            match core {
                compass_core::Error::Validation(msg) | compass_core::Error::InvalidData(msg) => {
                    return Self::bad_request(msg)
                }
                compass_core::Error::NotFound(msg) => return Self::not_found(msg),
                _ => {}
            }
        }
        if let Some(analytics) = err.downcast_ref::<AnalyticsError>() {
            match analytics {
                AnalyticsError::NoData(msg) => return Self::no_data(msg),
                AnalyticsError::MalformedInput(msg) => return Self::bad_request(msg),
                AnalyticsError::Upstream(msg) => {
                    warn!(error = %msg, "Completion service failed");
                    return Self::bad_gateway("Completion service unavailable");
                }
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            no_data: false,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
