//! CLI command tests

use chrono::{Duration, Utc};
use clap::Parser;
use compass_core::db::Database;
use compass_core::models::{NewTask, NewTransaction, Priority};
use tempfile::TempDir;

use crate::cli::{Cli, Commands};
use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn add_spend(db: &Database, amount: f64, category: &str) {
    db.create_transaction(&NewTransaction {
        amount,
        category: category.to_string(),
        description: None,
        date: Some(Utc::now().naive_utc() - Duration::days(1)),
    })
    .unwrap();
}

// ========== Argument Parsing ==========

#[test]
fn test_parse_budget_args() {
    let cli = Cli::try_parse_from(["compass", "budget", "--income", "5000", "--target", "25"])
        .unwrap();
    match cli.command {
        Commands::Budget { income, target } => {
            assert_eq!(income, 5000.0);
            assert_eq!(target, Some(25.0));
        }
        _ => panic!("expected budget command"),
    }
}

#[test]
fn test_global_options_defaults() {
    let cli = Cli::try_parse_from(["compass", "wheel"]).unwrap();
    assert_eq!(cli.db.to_str(), Some("compass.db"));
    assert!(!cli.no_encrypt);
    assert!(!cli.verbose);

    let cli = Cli::try_parse_from(["compass", "--no-encrypt", "--db", "x.db", "today"]).unwrap();
    assert!(cli.no_encrypt);
    assert_eq!(cli.db.to_str(), Some("x.db"));
}

#[test]
fn test_review_schedule_requires_concepts() {
    assert!(Cli::try_parse_from(["compass", "review-schedule"]).is_err());
    assert!(Cli::try_parse_from(["compass", "review-schedule", "--concepts", "3"]).is_ok());
}

// ========== Init ==========

#[test]
fn test_cmd_init_seeds_wheel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("compass.db");

    commands::cmd_init(&path, true).unwrap();
    // Running twice must not duplicate areas
    commands::cmd_init(&path, true).unwrap();

    let db = commands::open_db(&path, true).unwrap();
    assert_eq!(db.list_life_areas().unwrap().len(), 8);
}

// ========== Finance ==========

#[test]
fn test_cmd_spending_without_data() {
    let db = setup_test_db();
    assert!(commands::cmd_spending(&db, "month").is_ok());
}

#[test]
fn test_cmd_spending_with_data() {
    let db = setup_test_db();
    add_spend(&db, -1200.0, "rent");
    add_spend(&db, -45.0, "groceries");
    assert!(commands::cmd_spending(&db, "week").is_ok());
}

#[test]
fn test_cmd_budget() {
    let db = setup_test_db();
    add_spend(&db, -2000.0, "rent");
    add_spend(&db, -900.0, "dining");
    assert!(commands::cmd_budget(&db, 3200.0, Some(20.0)).is_ok());
    assert!(commands::cmd_budget(&db, 10_000.0, None).is_ok());
}

#[test]
fn test_cmd_cashflow_reads_plan() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plan.json");
    std::fs::write(
        &path,
        r#"{
            "income_sources": [{"name": "salary", "amount": 4000, "frequency": "monthly"}],
            "recurring_expenses": [{"name": "rent", "amount": 1500}]
        }"#,
    )
    .unwrap();

    let plan = commands::read_plan(&path).unwrap();
    assert_eq!(plan.income_sources.len(), 1);
    assert_eq!(plan.recurring_expenses[0].amount, 1500.0);

    assert!(commands::cmd_cashflow(&path, Some(3)).is_ok());
}

#[test]
fn test_cmd_cashflow_rejects_long_horizon() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plan.json");
    std::fs::write(&path, r#"{"income_sources": [{"amount": 100}]}"#).unwrap();

    assert!(commands::cmd_cashflow(&path, Some(120)).is_ok());
    assert!(commands::cmd_cashflow(&path, Some(4_000_000)).is_err());
}

#[test]
fn test_cmd_cashflow_bad_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(commands::cmd_cashflow(&missing, None).is_err());

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "not json").unwrap();
    assert!(commands::cmd_cashflow(&bad, None).is_err());
}

// ========== Life balance ==========

#[test]
fn test_cmd_wheel_seeds_defaults() {
    let db = setup_test_db();
    assert!(db.list_life_areas().unwrap().is_empty());

    commands::cmd_wheel(&db).unwrap();
    assert_eq!(db.list_life_areas().unwrap().len(), 8);
}

#[test]
fn test_cmd_burnout() {
    let db = setup_test_db();
    // No areas yet: reported as unknown, not an error
    assert!(commands::cmd_burnout(&db).is_ok());

    db.ensure_default_life_areas().unwrap();
    assert!(commands::cmd_burnout(&db).is_ok());
}

#[test]
fn test_cmd_review_schedule() {
    assert!(commands::cmd_review_schedule(4).is_ok());
}

#[test]
fn test_cmd_today() {
    let db = setup_test_db();
    assert!(commands::cmd_today(&db).is_ok());

    db.create_task(&NewTask {
        title: "Renew passport".to_string(),
        description: None,
        due_date: None,
        estimated_duration_minutes: None,
        priority: Priority::High,
        category: None,
        delegatable: false,
    })
    .unwrap();
    assert!(commands::cmd_today(&db).is_ok());
}

// ========== Utilities ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer title", 8), "a lon...");
    assert_eq!(truncate("café au lait", 7), "café...");
}
