//! Integration tests for compass-core
//!
//! These tests exercise the store → analyze → advise workflow through the
//! public API only.

use chrono::{NaiveDate, NaiveDateTime};
use compass_core::{
    analytics::{
        analyze_spending, project_cash_flow, recommend_budget, tasks::completion_stats,
        wheel::{area_burnout_risk, wheel_of_life},
        CashFlowItem, ExpenseItem, Frequency, RiskLevel, SpendingRecord, TimedActivity,
    },
    db::{Database, TransactionFilter},
    models::{NewActivity, NewTask, NewTransaction, Priority},
    AIClient, LifeBalanceAdvisor, MockBackend,
};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Three months of groceries and rent plus one oversized purchase
fn seed_transactions(db: &Database) {
    for month in 1..=3 {
        for (day, amount, category) in [
            (1, -1200.0, "rent"),
            (8, -80.0, "groceries"),
            (15, -95.0, "groceries"),
            (22, -85.0, "groceries"),
            (28, 4000.0, "salary"),
        ] {
            db.create_transaction(&NewTransaction {
                amount,
                category: category.to_string(),
                description: None,
                date: Some(at(2024, month, day)),
            })
            .expect("Failed to insert transaction");
        }
    }
    db.create_transaction(&NewTransaction {
        amount: -3500.0,
        category: "electronics".to_string(),
        description: Some("New laptop".to_string()),
        date: Some(at(2024, 3, 20)),
    })
    .expect("Failed to insert transaction");
}

// =============================================================================
// Finance workflow
// =============================================================================

#[test]
fn test_stored_spending_analysis() {
    let db = Database::in_memory().expect("Failed to create database");
    seed_transactions(&db);

    let transactions = db
        .list_transactions(&TransactionFilter {
            limit: 1000,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(transactions.len(), 16);

    let records: Vec<SpendingRecord> = transactions.iter().map(SpendingRecord::from).collect();
    let analysis = analyze_spending(&records).unwrap();

    // Salary is income and excluded
    assert_eq!(analysis.transaction_count, 13);
    assert_eq!(analysis.total_spending, 3.0 * (1200.0 + 260.0) + 3500.0);
    assert_eq!(analysis.category_analysis[0].category, "rent");
    assert_eq!(analysis.category_analysis[1].category, "electronics");
    assert_eq!(analysis.temporal_analysis.monthly.len(), 3);
    assert!(analysis
        .anomalies
        .iter()
        .any(|a| a.description.as_deref() == Some("New laptop")));
}

#[test]
fn test_budget_from_stored_expenses() {
    let db = Database::in_memory().expect("Failed to create database");
    seed_transactions(&db);

    let march = db
        .transactions_between(at(2024, 3, 1), at(2024, 3, 31))
        .unwrap();
    let expenses: Vec<ExpenseItem> = march
        .iter()
        .filter(|t| t.amount < 0.0)
        .map(|t| ExpenseItem {
            category: t.category.clone(),
            amount: -t.amount,
        })
        .collect();

    let budget = recommend_budget(6000.0, &expenses, 20.0);
    assert_eq!(budget.total_expenses, 4960.0);
    assert_eq!(budget.target_savings, 1200.0);
    assert!(budget.savings_gap > 0.0);

    let recommended: f64 = budget
        .category_recommendations
        .iter()
        .map(|c| c.recommended_amount)
        .sum();
    assert!((recommended - (6000.0 - 1200.0)).abs() < 0.05);
}

#[test]
fn test_cash_flow_projection() {
    let income = vec![CashFlowItem {
        name: Some("salary".to_string()),
        amount: 4000.0,
        frequency: Frequency::Monthly,
    }];
    let expenses = vec![
        CashFlowItem {
            name: Some("rent".to_string()),
            amount: 1200.0,
            frequency: Frequency::Monthly,
        },
        CashFlowItem {
            name: Some("insurance".to_string()),
            amount: 600.0,
            frequency: Frequency::Annual,
        },
    ];

    let projection =
        project_cash_flow(&income, &expenses, 3, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
            .unwrap();
    assert_eq!(projection.projections.len(), 3);
    assert_eq!(projection.projections[0].expenses, 1800.0);
    assert_eq!(projection.projections[1].expenses, 1200.0);
    assert_eq!(projection.summary.total_net, 3.0 * 4000.0 - 1800.0 - 2400.0);
}

// =============================================================================
// Tasks
// =============================================================================

#[test]
fn test_task_completion_flow() {
    let db = Database::in_memory().expect("Failed to create database");
    let mut ids = Vec::new();
    for (title, category) in [("Pay bills", Some("home")), ("Call mom", None), ("Gym", None)] {
        let task = db
            .create_task(&NewTask {
                title: title.to_string(),
                description: None,
                due_date: None,
                estimated_duration_minutes: None,
                priority: Priority::High,
                category: category.map(str::to_string),
                delegatable: false,
            })
            .unwrap();
        ids.push(task.id);
    }
    db.complete_task(ids[0]).unwrap();
    db.complete_task(ids[1]).unwrap();

    let start = at(2000, 1, 1);
    let end = at(2100, 1, 1);
    let tasks = db.tasks_touched_since(start).unwrap();
    let stats = completion_stats(&tasks, start, end);

    assert_eq!(stats.total_tasks_created, 3);
    assert_eq!(stats.total_tasks_completed, 2);
    assert_eq!(stats.completion_rate_percentage, 66.7);
    assert_eq!(stats.completed_by_category.get("home"), Some(&1));
    assert_eq!(stats.completed_by_category.get("uncategorized"), Some(&1));
}

// =============================================================================
// Life balance
// =============================================================================

#[test]
fn test_default_wheel_and_burnout() {
    let db = Database::in_memory().expect("Failed to create database");
    let areas = db.ensure_default_life_areas().unwrap();

    let wheel = wheel_of_life(&areas);
    assert_eq!(wheel.overall_score, 5.5);
    assert_eq!(wheel.areas[0].name, "Health");

    let risk = area_burnout_risk(&areas, 0);
    assert_eq!(risk.risk_level, RiskLevel::Medium);
}

#[tokio::test]
async fn test_logged_activities_feed_balance_advisor() {
    let db = Database::in_memory().expect("Failed to create database");
    for (kind, hours) in [("meetings", 30.0), ("emails", 10.0), ("exercise", 2.0), ("sleep", 1.0)] {
        db.create_activity(&NewActivity {
            activity_type: kind.to_string(),
            duration: hours,
            occurred_at: None,
        })
        .unwrap();
    }

    let activities: Vec<TimedActivity> = db
        .list_activities(None)
        .unwrap()
        .iter()
        .map(TimedActivity::from)
        .collect();

    let client: AIClient = MockBackend::new()
        .with_reply("work-life balance data", "- You work a lot\n- Rest more")
        .into();
    let report = LifeBalanceAdvisor::new(Some(client))
        .analyze_balance(&activities, "week")
        .await;

    assert_eq!(report.burnout_risk.work_time, 40.0);
    // Sleep is a health tag and counts as rest
    assert_eq!(report.burnout_risk.rest_time, 3.0);
    assert_eq!(report.burnout_risk.risk_level, RiskLevel::High);
    assert!(!report.insights.is_fallback());
    assert_eq!(report.insights.content().len(), 2);
    assert_eq!(report.timeframe, "week");
}

#[tokio::test]
async fn test_advisor_without_client_degrades() {
    let report = LifeBalanceAdvisor::default()
        .analyze_balance(&[], "month")
        .await;
    assert_eq!(report.balance_score, 0.0);
    assert!(report.insights.is_fallback());
    assert!(report.recommendations.content().is_empty());
}
