//! Expense operations

use chrono::NaiveDate;
use rusqlite::{params, Row};
use tracing::debug;

use super::expense_filter::ExpenseFilter;
use super::Database;
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};

const EXPENSE_COLUMNS: &str = "e.id, e.user_id, e.date, e.category, e.amount, e.description";

fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let date_str: String = row.get(2)?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date,
        category: row.get(3)?,
        amount: row.get(4)?,
        description: row.get(5)?,
    })
}

impl Database {
    /// Insert an expense for a user and return the stored record
    pub fn insert_expense(&self, user_id: i64, expense: &NewExpense) -> Result<Expense> {
        let conn = self.conn()?;

        let inserted = conn.execute(
            r#"
            INSERT INTO expenses (user_id, date, category, amount, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                expense.date.to_string(),
                expense.category,
                expense.amount,
                expense.description,
            ],
        );

        match inserted {
            Ok(_) => {}
            // Foreign key violation: the owner does not exist
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(Error::NotFound(format!("user {}", user_id)));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Expense {
            id: conn.last_insert_rowid(),
            user_id,
            date: expense.date,
            category: expense.category.clone(),
            amount: expense.amount,
            description: expense.description.clone(),
        })
    }

    /// Search a user's expenses, returned in insertion order
    pub fn search_expenses(&self, filter: ExpenseFilter<'_>) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        if filter.is_unfiltered() {
            debug!(user_id = filter.user_id, "Listing full expense history");
        }

        let result = filter.build();
        let sql = format!(
            "SELECT {} FROM expenses e {} {}",
            EXPENSE_COLUMNS, result.where_clause, result.order_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(result.params_refs().as_slice(), row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Count a user's expenses matching a filter
    pub fn count_expenses(&self, filter: ExpenseFilter<'_>) -> Result<i64> {
        let conn = self.conn()?;
        let result = filter.build();
        let count: i64 = conn.query_row(
            &result.build_count_query(),
            result.params_refs().as_slice(),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// List a user's full expense history in insertion order
    pub fn list_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        self.search_expenses(ExpenseFilter::new(user_id))
    }

    /// Amounts of a user's full history in insertion order (predictor input)
    pub fn list_expense_amounts(&self, user_id: i64) -> Result<Vec<f64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT amount FROM expenses WHERE user_id = ? ORDER BY id")?;
        let amounts = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<f64>, _>>()?;
        Ok(amounts)
    }

    /// Sum of a user's expenses whose date falls in the given year and month
    ///
    /// Returns 0 when there are no matching expenses.
    pub fn month_total(&self, user_id: i64, year: i32, month: u32) -> Result<f64> {
        let conn = self.conn()?;
        let year_month = format!("{:04}-{:02}", year, month);
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0.0)
            FROM expenses
            WHERE user_id = ? AND strftime('%Y-%m', date) = ?
            "#,
            params![user_id, year_month],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}
