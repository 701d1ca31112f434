//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod email;
pub mod finance;
pub mod health;
pub mod learning;
pub mod life_balance;
pub mod memory;
pub mod portfolio;
pub mod system;
pub mod tasks;

// Re-export all handlers for use in router
pub use audit::*;
pub use email::*;
pub use finance::*;
pub use health::*;
pub use learning::*;
pub use life_balance::*;
pub use memory::*;
pub use portfolio::*;
pub use system::*;
pub use tasks::*;

use axum::extract::Request;
use chrono::{NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{AppError, MAX_BODY_SIZE};
use compass_core::Period;

/// Read and parse a JSON request body
pub(crate) async fn read_json<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Query parameters shared by the windowed analyses
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisWindowQuery {
    /// "week", "month" (default) or "year"
    pub period: Option<String>,
    #[serde(alias = "start")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(alias = "end")]
    pub end_date: Option<NaiveDateTime>,
}

impl AnalysisWindowQuery {
    /// Explicit bounds win; a missing start is the period before the end
    pub fn resolve(&self) -> (Period, NaiveDateTime, NaiveDateTime) {
        let period = self
            .period
            .as_deref()
            .map(Period::parse_or_week)
            .unwrap_or(Period::Month);
        let end = self.end_date.unwrap_or_else(now);
        let start = self
            .start_date
            .unwrap_or_else(|| period.window_ending(end).0);
        (period, start, end)
    }
}

/// An analysis result tagged with the window it covers
#[derive(Debug, Serialize)]
pub struct Windowed<T> {
    pub period: Period,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(flatten)]
    pub analysis: T,
}

/// Clamp a requested page size to `1..=MAX_PAGE_LIMIT`
pub(crate) fn page_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, crate::MAX_PAGE_LIMIT)
}
