//! Dashboard and monthly goal handlers

use std::sync::Arc;

use axum::{extract::State, response::Response, Form};
use serde::{Deserialize, Serialize};
use tracing::info;

use pennywise_core::{budget, models::MonthSummary, Error};

use crate::session::{CurrentUser, Flash, Flashes};
use crate::{AppError, AppState};

#[derive(Serialize)]
struct DashboardView {
    username: String,
    #[serde(flatten)]
    summary: MonthSummary,
}

/// GET / - Current-month spend and goal progress
pub async fn index(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    flashes: Flashes,
) -> Result<Response, AppError> {
    let today = chrono::Local::now().date_naive();
    let summary = budget::month_summary(&state.db, &current.user, today)?;

    Ok(flashes.view(DashboardView {
        username: current.user.username,
        summary,
    }))
}

/// Form body for `/set_goal`
#[derive(Debug, Deserialize)]
pub struct GoalForm {
    pub monthly_goal: Option<String>,
}

/// POST /set_goal - Update the monthly spending goal
pub async fn set_goal(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    flashes: Flashes,
    Form(form): Form<GoalForm>,
) -> Result<Response, AppError> {
    let raw = form.monthly_goal.as_deref();
    if raw.map_or(true, |s| s.trim().is_empty()) {
        return Ok(flashes
            .push(Flash::error("Please provide a valid monthly goal."))
            .redirect("/"));
    }

    let goal = match budget::parse_goal(raw) {
        Ok(goal) => goal,
        Err(Error::InvalidGoalValue(_)) => {
            return Ok(flashes
                .push(Flash::error(
                    "Invalid value for monthly goal. Please enter a valid number.",
                ))
                .redirect("/"));
        }
        Err(e) => return Err(e.into()),
    };

    state.db.set_monthly_goal(current.id(), goal)?;
    info!(user = %current.user.username, goal, "Monthly goal updated");

    Ok(flashes
        .push(Flash::success("Monthly spending goal updated successfully!"))
        .redirect("/"))
}
