//! Expense ledger handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    Form,
};
use serde::{Deserialize, Serialize};

use pennywise_core::{ledger, models::Expense, Error};

use crate::session::{CurrentUser, Flash, Flashes};
use crate::{AppError, AppState};

const INVALID_DATE_MESSAGE: &str = "Invalid date. Please use the YYYY-MM-DD format.";
const INVALID_AMOUNT_MESSAGE: &str = "Invalid amount. Please enter a valid number.";

/// Form body for `/add`
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub description: String,
}

/// POST /add - Record an expense
pub async fn add_expense(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    flashes: Flashes,
    Form(form): Form<ExpenseForm>,
) -> Result<Response, AppError> {
    let result = ledger::add_expense(
        &state.db,
        current.id(),
        &form.date,
        &form.category,
        &form.amount,
        &form.description,
    );

    match result {
        Ok(_) => Ok(flashes.redirect("/")),
        Err(Error::InvalidDate(_)) => Ok(flashes
            .push(Flash::error(INVALID_DATE_MESSAGE))
            .redirect("/")),
        Err(Error::InvalidAmount(_)) => Ok(flashes
            .push(Flash::error(INVALID_AMOUNT_MESSAGE))
            .redirect("/")),
        Err(e) => Err(e.into()),
    }
}

/// Optional filters for `/expenses` (query string on GET, form body on POST)
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize)]
struct ExpensesView {
    expenses: Vec<Expense>,
    count: usize,
}

fn render_expenses(
    state: &AppState,
    current: &CurrentUser,
    flashes: Flashes,
    query: &ExpenseQuery,
) -> Result<Response, AppError> {
    let result = ledger::query_expenses(
        &state.db,
        current.id(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        query.category.as_deref(),
    );

    match result {
        Ok(expenses) => Ok(flashes.view(ExpensesView {
            count: expenses.len(),
            expenses,
        })),
        Err(Error::InvalidDate(_)) => Ok(flashes
            .push(Flash::error(INVALID_DATE_MESSAGE))
            .redirect("/expenses")),
        Err(e) => Err(e.into()),
    }
}

/// GET /expenses - List expenses, optionally filtered via the query string
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    flashes: Flashes,
    Query(query): Query<ExpenseQuery>,
) -> Result<Response, AppError> {
    render_expenses(&state, &current, flashes, &query)
}

/// POST /expenses - Filter expenses from a submitted form
pub async fn filter_expenses(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    flashes: Flashes,
    Form(query): Form<ExpenseQuery>,
) -> Result<Response, AppError> {
    render_expenses(&state, &current, flashes, &query)
}
