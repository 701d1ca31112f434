//! Budget recommender
//!
//! A savings shortfall is closed by shrinking every category by the same
//! factor, `gap / total_expenses`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One expense line; lines sharing a category are summed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecommendation {
    pub category: String,
    pub current_amount: f64,
    pub recommended_amount: f64,
    pub reduction: f64,
    pub reduction_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetRecommendation {
    pub monthly_income: f64,
    pub total_expenses: f64,
    pub current_savings: f64,
    pub current_savings_percentage: f64,
    pub target_savings: f64,
    pub target_savings_percentage: f64,
    pub savings_gap: f64,
    /// Largest reduction first
    pub category_recommendations: Vec<CategoryRecommendation>,
}

pub const DEFAULT_SAVINGS_GOAL_PERCENTAGE: f64 = 20.0;

/// Days of stored spending used as current expenses when none are given
pub const EXPENSE_WINDOW_DAYS: i64 = 30;

pub fn recommend_budget(
    income: f64,
    expenses: &[ExpenseItem],
    savings_goal_percentage: f64,
) -> BudgetRecommendation {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses {
        *by_category.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }

    let total_expenses: f64 = by_category.values().sum();
    let current_savings = income - total_expenses;
    let current_savings_percentage = if income > 0.0 {
        current_savings / income * 100.0
    } else {
        0.0
    };

    let target_savings = income * (savings_goal_percentage / 100.0);
    let savings_gap = target_savings - current_savings;

    // With nothing to cut the factor is meaningless; report zero reductions
    let reduction_factor = if savings_gap > 0.0 && total_expenses > 0.0 {
        savings_gap / total_expenses
    } else {
        0.0
    };

    let mut category_recommendations: Vec<CategoryRecommendation> = by_category
        .into_iter()
        .map(|(category, amount)| {
            let recommended_amount = amount * (1.0 - reduction_factor);
            let reduction = amount - recommended_amount;
            CategoryRecommendation {
                category: category.to_string(),
                current_amount: amount,
                recommended_amount,
                reduction,
                reduction_percentage: if amount > 0.0 {
                    reduction / amount * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    category_recommendations.sort_by(|a, b| b.reduction.total_cmp(&a.reduction));

    BudgetRecommendation {
        monthly_income: income,
        total_expenses,
        current_savings,
        current_savings_percentage,
        target_savings,
        target_savings_percentage: savings_goal_percentage,
        savings_gap,
        category_recommendations,
    }
}
