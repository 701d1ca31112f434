//! Investment holding handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::Deserialize;

use super::read_json;
use crate::{audit_user, AppError, AppState, SuccessResponse};
use compass_core::analytics::portfolio::{portfolio_allocation, PortfolioAllocation};
use compass_core::models::{AssetClass, Investment, InvestmentUpdate, NewInvestment};

/// Query parameters for listing investments
#[derive(Debug, Deserialize)]
pub struct InvestmentQuery {
    pub asset_class: Option<AssetClass>,
    pub account: Option<String>,
}

/// POST /api/portfolio/investments - Add a holding
pub async fn create_investment(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Investment>, AppError> {
    let user = audit_user(request.headers());
    let req: NewInvestment = read_json(request).await?;

    let investment = state.db.create_investment(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("investment"),
        Some(investment.id),
        Some(&format!(
            "symbol={}, class={}",
            investment.symbol, investment.asset_class
        )),
    )?;

    Ok(Json(investment))
}

/// GET /api/portfolio/investments - List holdings
pub async fn list_investments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InvestmentQuery>,
    request: Request,
) -> Result<Json<Vec<Investment>>, AppError> {
    let user = audit_user(request.headers());

    let investments = state
        .db
        .list_investments(params.asset_class, params.account.as_deref())?;

    state.db.log_audit(
        &user,
        "list",
        Some("investment"),
        None,
        Some(&format!("count={}", investments.len())),
    )?;

    Ok(Json(investments))
}

/// GET /api/portfolio/investments/:id - Get a single holding
pub async fn get_investment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Investment>, AppError> {
    let user = audit_user(request.headers());

    let investment = state
        .db
        .get_investment(id)?
        .ok_or_else(|| AppError::not_found(&format!("Investment {} not found", id)))?;

    state
        .db
        .log_audit(&user, "get", Some("investment"), Some(id), None)?;

    Ok(Json(investment))
}

/// PUT /api/portfolio/investments/:id - Partially update a holding
pub async fn update_investment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Investment>, AppError> {
    let user = audit_user(request.headers());
    let req: InvestmentUpdate = read_json(request).await?;

    let investment = state
        .db
        .update_investment(id, &req)?
        .ok_or_else(|| AppError::not_found(&format!("Investment {} not found", id)))?;

    state
        .db
        .log_audit(&user, "update", Some("investment"), Some(id), None)?;

    Ok(Json(investment))
}

/// DELETE /api/portfolio/investments/:id - Remove a holding
pub async fn delete_investment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = audit_user(request.headers());

    if !state.db.delete_investment(id)? {
        return Err(AppError::not_found(&format!("Investment {} not found", id)));
    }

    state
        .db
        .log_audit(&user, "delete", Some("investment"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/portfolio/analysis/portfolio-allocation - Allocation by asset class
pub async fn portfolio_allocation_analysis(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<PortfolioAllocation>, AppError> {
    let user = audit_user(request.headers());

    let investments = state.db.list_investments(None, None)?;

    state.db.log_audit(
        &user,
        "analyze",
        Some("portfolio_allocation"),
        None,
        Some(&format!("holdings={}", investments.len())),
    )?;

    Ok(Json(portfolio_allocation(&investments)?))
}
