//! Pennywise Core Library
//!
//! Shared functionality for the Pennywise expense tracker:
//! - Database access and migrations (users, expenses, sessions)
//! - Credential store with Argon2 password hashing
//! - Expense ledger input validation and filtered queries
//! - Monthly goal progress and next-expense trend prediction

pub mod auth;
pub mod budget;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;

pub use budget::{LinearFit, ModelEvaluation, Prediction};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{Expense, MonthSummary, NewExpense, User};
