//! Integration tests for pennywise-core
//!
//! These tests exercise the full register → record → query → predict workflow.

use chrono::NaiveDate;
use pennywise_core::{
    auth,
    budget::{self, Prediction},
    db::Database,
    ledger, Error,
};

/// A small history spread over three months, in the order it was entered
fn seed_history(db: &Database, user_id: i64) {
    let rows = [
        ("2024-01-03", "food", "12.00", "groceries"),
        ("2024-01-15", "rent", "800.00", "january rent"),
        ("2024-01-28", "food", "30.00", "dinner"),
        ("2024-02-02", "food", "18.00", "groceries"),
        ("2024-02-14", "gifts", "45.00", "flowers"),
        ("2024-03-01", "rent", "800.00", "march rent"),
    ];
    for (date, category, amount, description) in rows {
        ledger::add_expense(db, user_id, date, category, amount, description)
            .expect("Failed to add expense");
    }
}

#[test]
fn test_full_workflow() {
    let db = Database::in_memory().expect("Failed to create database");

    auth::register(&db, "tess", "correct horse").expect("Failed to register");
    let user = auth::verify(&db, "tess", "correct horse").expect("Failed to verify");

    seed_history(&db, user.id);

    // January only
    let january =
        ledger::query_expenses(&db, user.id, Some("2024-01-01"), Some("2024-01-31"), None)
            .unwrap();
    assert_eq!(january.len(), 3);
    assert!(january
        .iter()
        .all(|e| e.date.format("%Y-%m").to_string() == "2024-01"));

    // January food only
    let january_food = ledger::query_expenses(
        &db,
        user.id,
        Some("2024-01-01"),
        Some("2024-01-31"),
        Some("food"),
    )
    .unwrap();
    assert_eq!(january_food.len(), 2);
    assert!(january_food.iter().all(|e| e.category == "food"));

    // No filters: full history
    let all = ledger::query_expenses(&db, user.id, None, None, None).unwrap();
    assert_eq!(all.len(), 6);

    // Goal progress for February: 63 of 126 spent
    db.set_monthly_goal(user.id, 126.0).unwrap();
    let user = db.get_user(user.id).unwrap().unwrap();
    let feb = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
    let summary = budget::month_summary(&db, &user, feb).unwrap();
    assert_eq!(summary.total_spent, 63.0);
    assert_eq!(summary.progress_percentage, 50.0);

    // March overspends the goal and is clamped
    let march = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let summary = budget::month_summary(&db, &user, march).unwrap();
    assert_eq!(summary.total_spent, 800.0);
    assert_eq!(summary.progress_percentage, 100.0);

    // Prediction matches the pure predictor on the stored amounts
    let amounts: Vec<f64> = all.iter().map(|e| e.amount).collect();
    let expected = budget::predict_next(&amounts);
    let prediction = budget::predict_budget(&db, user.id).unwrap();
    assert_eq!(prediction, expected);
    assert!(matches!(prediction, Prediction::Predicted(_)));

    let evaluation = budget::evaluate_budget_model(&db, user.id).unwrap();
    assert!(evaluation.is_some());
}

#[test]
fn test_prediction_needs_two_records() {
    let db = Database::in_memory().unwrap();
    let user = auth::register(&db, "uma", "pw").unwrap();

    assert_eq!(
        budget::predict_budget(&db, user.id).unwrap(),
        Prediction::InsufficientData
    );

    ledger::add_expense(&db, user.id, "2024-01-01", "food", "10", "").unwrap();
    assert_eq!(
        budget::predict_budget(&db, user.id).unwrap(),
        Prediction::InsufficientData
    );
    assert!(budget::evaluate_budget_model(&db, user.id)
        .unwrap()
        .is_none());

    ledger::add_expense(&db, user.id, "2024-01-02", "food", "20", "").unwrap();
    ledger::add_expense(&db, user.id, "2024-01-03", "food", "30", "").unwrap();
    assert_eq!(
        budget::predict_budget(&db, user.id).unwrap(),
        Prediction::Predicted(40.0)
    );
}

#[test]
fn test_users_do_not_see_each_other() {
    let db = Database::in_memory().unwrap();
    let a = auth::register(&db, "vic", "pw").unwrap();
    let b = auth::register(&db, "wes", "pw").unwrap();

    seed_history(&db, a.id);

    assert!(ledger::query_expenses(&db, b.id, None, None, None)
        .unwrap()
        .is_empty());
    assert_eq!(
        budget::predict_budget(&db, b.id).unwrap(),
        Prediction::InsufficientData
    );
    let jan = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    assert_eq!(ledger::current_month_total(&db, b.id, jan).unwrap(), 0.0);
}

#[test]
fn test_duplicate_registration() {
    let db = Database::in_memory().unwrap();
    auth::register(&db, "xena", "original").unwrap();

    let err = auth::register(&db, "xena", "replacement").unwrap_err();
    assert!(matches!(err, Error::DuplicateUser(_)));
    assert!(err.is_user_error());

    assert!(auth::verify(&db, "xena", "original").is_ok());
}
