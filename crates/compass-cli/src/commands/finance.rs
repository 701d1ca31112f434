//! Finance analysis commands (spending, budget, cashflow)

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use compass_core::analytics::budget::DEFAULT_SAVINGS_GOAL_PERCENTAGE;
use compass_core::analytics::cashflow::DEFAULT_MONTHS_AHEAD;
use compass_core::analytics::{
    analyze_spending, project_cash_flow, recommend_budget, AnalyticsError, CashFlowItem,
    SpendingRecord,
};
use compass_core::db::Database;
use compass_core::Period;
use serde::Deserialize;

pub fn cmd_spending(db: &Database, period: &str) -> Result<()> {
    let period = Period::parse_or_month(period);
    let (start, end) = period.window_ending(Utc::now().naive_utc());

    let records: Vec<SpendingRecord> = db
        .transactions_between(start, end)?
        .iter()
        .map(SpendingRecord::from)
        .collect();

    let analysis = match analyze_spending(&records) {
        Ok(analysis) => analysis,
        Err(AnalyticsError::NoData(_)) => {
            println!("No transactions in the last {}.", period.as_str());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    println!("💸 Spending - last {}", period.as_str());
    println!("   ─────────────────────────────");
    println!(
        "   Total: ${:.2} across {} transactions",
        analysis.total_spending, analysis.transaction_count
    );
    println!();
    for category in &analysis.category_analysis {
        println!(
            "   {:<20} ${:>10.2}  {:>6.2}%  ({} tx)",
            super::truncate(&category.category, 20),
            category.sum,
            category.percentage,
            category.count
        );
    }

    if !analysis.anomalies.is_empty() {
        println!();
        println!("   ⚠️  Unusual spending:");
        for anomaly in &analysis.anomalies {
            println!(
                "      ${:.2} {} {}",
                anomaly.amount,
                anomaly.category,
                anomaly.description.as_deref().unwrap_or("")
            );
        }
    }

    Ok(())
}

pub fn cmd_budget(db: &Database, income: f64, target: Option<f64>) -> Result<()> {
    let goal = target.unwrap_or(DEFAULT_SAVINGS_GOAL_PERCENTAGE);
    let expenses = db.recent_expenses(Utc::now().naive_utc())?;
    let rec = recommend_budget(income, &expenses, goal);

    println!();
    println!("📋 Budget (savings goal {:.0}%)", goal);
    println!("   ─────────────────────────────");
    println!("   Income:          ${:.2}", rec.monthly_income);
    println!("   Expenses:        ${:.2}", rec.total_expenses);
    println!(
        "   Saving now:      ${:.2} ({:.1}%)",
        rec.current_savings, rec.current_savings_percentage
    );
    println!("   Target savings:  ${:.2}", rec.target_savings);

    if rec.savings_gap <= 0.0 {
        println!();
        println!("✅ You're already meeting your savings goal.");
        return Ok(());
    }

    println!("   Gap:             ${:.2}", rec.savings_gap);
    println!();
    for category in &rec.category_recommendations {
        println!(
            "   {:<20} ${:>10.2} -> ${:>10.2}  (-{:.1}%)",
            super::truncate(&category.category, 20),
            category.current_amount,
            category.recommended_amount,
            category.reduction_percentage
        );
    }

    Ok(())
}

/// Contents of a cash-flow plan file
#[derive(Debug, Deserialize)]
pub struct CashFlowPlan {
    #[serde(default)]
    pub income_sources: Vec<CashFlowItem>,
    #[serde(default)]
    pub recurring_expenses: Vec<CashFlowItem>,
}

pub fn read_plan(path: &Path) -> Result<CashFlowPlan> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid plan file {}", path.display()))
}

pub fn cmd_cashflow(path: &Path, months: Option<u32>) -> Result<()> {
    let plan = read_plan(path)?;
    let months = months.unwrap_or(DEFAULT_MONTHS_AHEAD);

    let projection = project_cash_flow(
        &plan.income_sources,
        &plan.recurring_expenses,
        months,
        Utc::now().date_naive(),
    )
    .with_context(|| format!("Cannot project {} months", months))?;

    println!();
    println!("📈 Cash flow - next {} months", months);
    println!("   ─────────────────────────────");
    for month in &projection.projections {
        println!(
            "   {}  in ${:>10.2}  out ${:>10.2}  net ${:>10.2}",
            month.month, month.income, month.expenses, month.net
        );
    }
    println!();
    println!(
        "   Total net: ${:.2} (avg ${:.2}/month)",
        projection.summary.total_net, projection.summary.average_monthly_net
    );

    Ok(())
}
