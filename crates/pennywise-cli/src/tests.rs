//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use pennywise_core::budget::{self, Prediction};
use pennywise_core::db::Database;
use pennywise_core::{auth, ledger};

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn setup_user(db: &Database, username: &str) -> i64 {
    auth::register(db, username, "pw").unwrap().id
}

// ========== Database Setup Tests ==========

#[test]
fn test_open_db_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("db").join("expenses.db");

    let db = commands::open_db(&path).unwrap();
    assert!(path.exists());
    assert!(db.get_user_by_username("nobody").unwrap().is_none());
}

#[test]
fn test_cmd_init_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.db");

    commands::cmd_init(&path).unwrap();
    {
        let db = commands::open_db(&path).unwrap();
        setup_user(&db, "ana");
    }
    commands::cmd_init(&path).unwrap();

    let db = commands::open_db(&path).unwrap();
    assert!(db.get_user_by_username("ana").unwrap().is_some());
}

// ========== User Command Tests ==========

#[test]
fn test_cmd_register() {
    let db = setup_test_db();
    commands::cmd_register(&db, "bea", "secret").unwrap();
    assert!(auth::verify(&db, "bea", "secret").is_ok());

    let err = commands::cmd_register(&db, "bea", "other").unwrap_err();
    assert!(err.to_string().contains("already exists"));

    let err = commands::cmd_register(&db, "", "pw").unwrap_err();
    assert!(err.to_string().contains("required"));
}

#[test]
fn test_find_user_unknown() {
    let db = setup_test_db();
    let err = commands::find_user(&db, "ghost").unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

// ========== Expense Command Tests ==========

#[test]
fn test_cmd_add() {
    let db = setup_test_db();
    let user_id = setup_user(&db, "cal");

    commands::cmd_add(&db, "cal", "2024-05-01", "food", "12.50", "lunch").unwrap();

    let expenses = db.list_expenses(user_id).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, 12.5);
    assert_eq!(expenses[0].description, "lunch");
}

#[test]
fn test_cmd_add_rejects_bad_input() {
    let db = setup_test_db();
    let user_id = setup_user(&db, "dan");

    assert!(commands::cmd_add(&db, "dan", "05/01/2024", "food", "1", "").is_err());
    assert!(commands::cmd_add(&db, "dan", "2024-05-01", "food", "lots", "").is_err());
    assert!(commands::cmd_add(&db, "nobody", "2024-05-01", "food", "1", "").is_err());

    assert!(db.list_expenses(user_id).unwrap().is_empty());
}

#[test]
fn test_cmd_expenses() {
    let db = setup_test_db();
    let user_id = setup_user(&db, "eli");
    ledger::add_expense(&db, user_id, "2024-01-10", "food", "5", "").unwrap();
    ledger::add_expense(&db, user_id, "2024-02-10", "fuel", "50", "").unwrap();

    assert!(commands::cmd_expenses(&db, "eli", None, None, None).is_ok());
    assert!(commands::cmd_expenses(
        &db,
        "eli",
        Some("2024-01-01"),
        Some("2024-01-31"),
        Some("food")
    )
    .is_ok());
    assert!(commands::cmd_expenses(&db, "eli", Some("yesterday"), None, None).is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_goal() {
    let db = setup_test_db();
    let user_id = setup_user(&db, "fin");

    commands::cmd_goal(&db, "fin", "250").unwrap();
    assert_eq!(db.get_user(user_id).unwrap().unwrap().monthly_goal, 250.0);

    assert!(commands::cmd_goal(&db, "fin", "abc").is_err());
    assert!(commands::cmd_goal(&db, "fin", "").is_err());
    assert_eq!(db.get_user(user_id).unwrap().unwrap().monthly_goal, 250.0);
}

#[test]
fn test_cmd_summary() {
    let db = setup_test_db();
    setup_user(&db, "gil");
    assert!(commands::cmd_summary(&db, "gil").is_ok());

    commands::cmd_goal(&db, "gil", "100").unwrap();
    assert!(commands::cmd_summary(&db, "gil").is_ok());
}

#[test]
fn test_cmd_predict() {
    let db = setup_test_db();
    let user_id = setup_user(&db, "hon");

    assert!(commands::cmd_predict(&db, "hon", false).is_ok());
    assert!(commands::cmd_predict(&db, "hon", true).is_ok());

    for amount in ["10", "20", "30"] {
        ledger::add_expense(&db, user_id, "2024-01-01", "misc", amount, "").unwrap();
    }
    assert!(commands::cmd_predict(&db, "hon", false).is_ok());
    assert_eq!(
        budget::predict_budget(&db, user_id).unwrap(),
        Prediction::Predicted(40.0)
    );
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("this is too long", 10), "this is...");
    assert_eq!(truncate("épicerie fine", 8), "épice...");
}
