//! Budget prediction handlers

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use pennywise_core::budget::{self, Prediction, INSUFFICIENT_EVALUATION_MESSAGE};

use crate::session::CurrentUser;
use crate::{AppError, AppState};

/// Response for `/predict_budget`
#[derive(Serialize)]
pub struct PredictionResponse {
    /// Either a number or the insufficient-data message
    pub predicted_budget: Prediction,
}

/// GET /predict_budget - Extrapolate the next expense from the user's history
pub async fn predict_budget(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<PredictionResponse>, AppError> {
    let predicted_budget = budget::predict_budget(&state.db, current.id())?;
    Ok(Json(PredictionResponse { predicted_budget }))
}

/// GET /evaluate - In-sample error of the trend model
pub async fn evaluate_model(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Response, AppError> {
    let response = match budget::evaluate_budget_model(&state.db, current.id())? {
        Some(evaluation) => Json(evaluation).into_response(),
        None => Json(serde_json::json!({ "error": INSUFFICIENT_EVALUATION_MESSAGE }))
            .into_response(),
    };
    Ok(response)
}
