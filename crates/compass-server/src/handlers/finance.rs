//! Transaction, budget, and money-analysis handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use chrono::NaiveDateTime;
use serde::Deserialize;

use super::{now, page_limit, read_json, AnalysisWindowQuery, Windowed};
use crate::{audit_user, AppError, AppState};
use compass_core::analytics::budget::DEFAULT_SAVINGS_GOAL_PERCENTAGE;
use compass_core::analytics::cashflow::DEFAULT_MONTHS_AHEAD;
use compass_core::analytics::{
    analyze_spending, project_cash_flow, recommend_budget, BudgetRecommendation, CashFlowItem,
    CashFlowProjection, ExpenseItem, SpendingAnalysis, SpendingRecord,
};
use compass_core::db::TransactionFilter;
use compass_core::models::{Budget, NewBudget, NewTransaction, Transaction};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(alias = "start")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(alias = "end")]
    pub end_date: Option<NaiveDateTime>,
    pub category: Option<String>,
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

/// POST /api/finance/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let user = audit_user(request.headers());
    let req: NewTransaction = read_json(request).await?;

    let tx = state.db.create_transaction(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("transaction"),
        Some(tx.id),
        Some(&format!("amount={}, category={}", tx.amount, tx.category)),
    )?;

    Ok(Json(tx))
}

/// GET /api/finance/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
    request: Request,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let user = audit_user(request.headers());

    let filter = TransactionFilter {
        start: params.start_date,
        end: params.end_date,
        category: params.category,
        skip: params.skip.max(0),
        limit: page_limit(params.limit, 100),
    };
    let transactions = state.db.list_transactions(&filter)?;

    state.db.log_audit(
        &user,
        "list",
        Some("transaction"),
        None,
        Some(&format!("count={}", transactions.len())),
    )?;

    Ok(Json(transactions))
}

/// POST /api/finance/budgets - Create a budget
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Budget>, AppError> {
    let user = audit_user(request.headers());
    let req: NewBudget = read_json(request).await?;

    let budget = state.db.create_budget(&req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("budget"),
        Some(budget.id),
        Some(&format!("category={}, amount={}", budget.category, budget.amount)),
    )?;

    Ok(Json(budget))
}

/// GET /api/finance/budgets - List budgets
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Budget>>, AppError> {
    let user = audit_user(request.headers());

    let budgets = state.db.list_budgets()?;

    state.db.log_audit(
        &user,
        "list",
        Some("budget"),
        None,
        Some(&format!("count={}", budgets.len())),
    )?;

    Ok(Json(budgets))
}

/// GET /api/finance/analysis/spending - Analyze stored transactions in a window
pub async fn spending_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalysisWindowQuery>,
    request: Request,
) -> Result<Json<Windowed<SpendingAnalysis>>, AppError> {
    let user = audit_user(request.headers());
    let (period, start, end) = params.resolve();

    let records: Vec<SpendingRecord> = state
        .db
        .transactions_between(start, end)?
        .iter()
        .map(SpendingRecord::from)
        .collect();

    state.db.log_audit(
        &user,
        "analyze",
        Some("spending"),
        None,
        Some(&format!("period={}, records={}", period.as_str(), records.len())),
    )?;

    let analysis = analyze_spending(&records)?;

    Ok(Json(Windowed {
        period,
        start_date: start,
        end_date: end,
        analysis,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SpendingPatternsRequest {
    pub transactions: Vec<SpendingRecord>,
}

/// POST /api/finance/analysis/patterns - Analyze caller-supplied transactions
pub async fn spending_patterns(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<SpendingAnalysis>, AppError> {
    let user = audit_user(request.headers());
    let req: SpendingPatternsRequest = read_json(request).await?;

    state.db.log_audit(
        &user,
        "analyze",
        Some("spending_patterns"),
        None,
        Some(&format!("records={}", req.transactions.len())),
    )?;

    Ok(Json(analyze_spending(&req.transactions)?))
}

#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    pub income: f64,
    /// Defaults to stored spending over the last 30 days
    #[serde(default)]
    pub expenses: Option<Vec<ExpenseItem>>,
    #[serde(default)]
    pub savings_goal_percentage: Option<f64>,
}

/// POST /api/finance/analysis/budget - Recommend a budget that meets a savings goal
pub async fn budget_recommendation(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<BudgetRecommendation>, AppError> {
    let user = audit_user(request.headers());
    let req: BudgetRequest = read_json(request).await?;

    let expenses = match req.expenses {
        Some(expenses) => expenses,
        None => state.db.recent_expenses(now())?,
    };
    let goal = req
        .savings_goal_percentage
        .unwrap_or(DEFAULT_SAVINGS_GOAL_PERCENTAGE);

    let recommendation = recommend_budget(req.income, &expenses, goal);

    state.db.log_audit(
        &user,
        "analyze",
        Some("budget"),
        None,
        Some(&format!(
            "income={}, expenses={}, goal={}",
            req.income,
            expenses.len(),
            goal
        )),
    )?;

    Ok(Json(recommendation))
}

#[derive(Debug, Deserialize)]
pub struct CashFlowRequest {
    #[serde(default)]
    pub income_sources: Vec<CashFlowItem>,
    #[serde(default)]
    pub recurring_expenses: Vec<CashFlowItem>,
    #[serde(default)]
    pub months_ahead: Option<u32>,
}

/// POST /api/finance/analysis/cash-flow - Project monthly cash flow
pub async fn cash_flow_projection(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<CashFlowProjection>, AppError> {
    let user = audit_user(request.headers());
    let req: CashFlowRequest = read_json(request).await?;

    let months = req.months_ahead.unwrap_or(DEFAULT_MONTHS_AHEAD);

    state.db.log_audit(
        &user,
        "analyze",
        Some("cash_flow"),
        None,
        Some(&format!("months={}", months)),
    )?;

    let projection = project_cash_flow(
        &req.income_sources,
        &req.recurring_expenses,
        months,
        now().date(),
    )?;

    Ok(Json(projection))
}
