//! Expense ledger: input validation, filtered queries and month totals
//!
//! Raw form/CLI strings come in here; typed records go to the database.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::db::{Database, ExpenseFilter};
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};

/// Date format accepted for expense input and filters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(input.to_string()))
}

/// Parse an optional filter date; missing or blank input means "no bound"
pub fn parse_optional_date(input: Option<&str>) -> Result<Option<NaiveDate>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some),
    }
}

/// Parse a decimal amount (any sign; must be finite)
pub fn parse_amount(input: &str) -> Result<f64> {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidAmount(input.to_string())),
    }
}

/// Validate raw input and record a new expense for `user_id`
///
/// The date is checked before the amount, so input that is wrong in both
/// places reports `InvalidDate`. Nothing is written on failure.
pub fn add_expense(
    db: &Database,
    user_id: i64,
    date: &str,
    category: &str,
    amount: &str,
    description: &str,
) -> Result<Expense> {
    let expense = NewExpense {
        date: parse_date(date)?,
        category: category.to_string(),
        amount: parse_amount(amount)?,
        description: description.to_string(),
    };

    let stored = db.insert_expense(user_id, &expense)?;
    debug!(user_id, expense_id = stored.id, "Recorded expense");
    Ok(stored)
}

/// Query a user's expenses with optional inclusive date bounds and exact category
///
/// Blank strings are treated as absent filters.
pub fn query_expenses(
    db: &Database,
    user_id: i64,
    start_date: Option<&str>,
    end_date: Option<&str>,
    category: Option<&str>,
) -> Result<Vec<Expense>> {
    let filter = ExpenseFilter::new(user_id)
        .start_date(parse_optional_date(start_date)?)
        .end_date(parse_optional_date(end_date)?)
        .category(category.filter(|c| !c.is_empty()));

    db.search_expenses(filter)
}

/// Total spent by a user in the month (and year) of `reference`
pub fn current_month_total(db: &Database, user_id: i64, reference: NaiveDate) -> Result<f64> {
    db.month_total(user_id, reference.year(), reference.month())
}
