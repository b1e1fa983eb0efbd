//! Domain models for Pennywise

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
///
/// The credential hash never leaves the database layer; see
/// [`crate::db::Database::get_credentials`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Monthly spending goal. Zero means "no goal set".
    pub monthly_goal: f64,
    pub created_at: DateTime<Utc>,
}

/// A stored expense record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub category: String,
    /// Conventionally a positive cost, but any sign is accepted
    pub amount: f64,
    pub description: String,
}

/// A validated expense before DB insertion
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub description: String,
}

/// Dashboard figures for the current month
#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub total_spent: f64,
    pub monthly_goal: f64,
    /// Share of the goal consumed, clamped to 0..=100
    pub progress_percentage: f64,
}
