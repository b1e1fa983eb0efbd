//! Monthly goal progress and next-expense trend prediction
//!
//! The predictor fits an ordinary least-squares line through
//! `(index, amount)` pairs, where the index is the record's position in
//! insertion order (not its date), and extrapolates one step past the end.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::ledger;
use crate::models::{MonthSummary, User};

/// Message returned in place of a prediction when history is too short
pub const INSUFFICIENT_DATA_MESSAGE: &str = "Not enough data to make a prediction";

/// Message returned in place of an evaluation when history is too short
pub const INSUFFICIENT_EVALUATION_MESSAGE: &str = "Not enough data to evaluate the model";

/// Minimum number of records needed to fit a line
pub const MIN_RECORDS: usize = 2;

/// Percentage of the monthly goal consumed, clamped to 100
///
/// A goal of zero (or below) means "no goal" and always yields 0.
pub fn goal_progress(total_spent: f64, monthly_goal: f64) -> f64 {
    if monthly_goal <= 0.0 {
        return 0.0;
    }
    (total_spent / monthly_goal * 100.0).min(100.0)
}

/// Parse monthly goal input; blank or non-numeric input is rejected
///
/// Negative values are accepted as-is.
pub fn parse_goal(input: Option<&str>) -> Result<f64> {
    let raw = input.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(Error::InvalidGoalValue(raw.to_string()));
    }
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidGoalValue(raw.to_string())),
    }
}

/// A fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares fit of `amounts[i]` against `i`
///
/// Returns `None` for fewer than two points.
pub fn fit_linear(amounts: &[f64]) -> Option<LinearFit> {
    let n = amounts.len();
    if n < MIN_RECORDS {
        return None;
    }

    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = amounts.iter().sum::<f64>() / n_f;

    let (cov, var) = amounts
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(cov, var), (i, &y)| {
            let dx = i as f64 - mean_x;
            (cov + dx * (y - mean_y), var + dx * dx)
        });

    // var > 0 whenever n >= 2 since the indices are distinct
    let slope = cov / var;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Outcome of a budget prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prediction {
    /// Fewer than two records exist
    InsufficientData,
    /// Extrapolated value at index `n` (may be negative)
    Predicted(f64),
}

impl Prediction {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::InsufficientData => None,
            Self::Predicted(v) => Some(*v),
        }
    }
}

/// Serializes as the bare number, or the insufficient-data message string
impl Serialize for Prediction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::InsufficientData => serializer.serialize_str(INSUFFICIENT_DATA_MESSAGE),
            Self::Predicted(v) => serializer.serialize_f64(*v),
        }
    }
}

/// Predict the next amount from a history in insertion order
pub fn predict_next(amounts: &[f64]) -> Prediction {
    match fit_linear(amounts) {
        Some(fit) => Prediction::Predicted(fit.predict(amounts.len() as f64)),
        None => Prediction::InsufficientData,
    }
}

/// In-sample error of the trend line, rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelEvaluation {
    pub mean_absolute_error: f64,
    pub root_mean_squared_error: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Evaluate the fitted line against the points it was trained on
pub fn evaluate(amounts: &[f64]) -> Option<ModelEvaluation> {
    let fit = fit_linear(amounts)?;
    let n = amounts.len() as f64;

    let (abs_sum, sq_sum) = amounts
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(abs_sum, sq_sum), (i, &y)| {
            let residual = fit.predict(i as f64) - y;
            (abs_sum + residual.abs(), sq_sum + residual * residual)
        });

    Some(ModelEvaluation {
        mean_absolute_error: round2(abs_sum / n),
        root_mean_squared_error: round2((sq_sum / n).sqrt()),
    })
}

/// Current-month spend and goal progress for a user
pub fn month_summary(db: &Database, user: &User, today: NaiveDate) -> Result<MonthSummary> {
    let total_spent = ledger::current_month_total(db, user.id, today)?;
    Ok(MonthSummary {
        total_spent,
        monthly_goal: user.monthly_goal,
        progress_percentage: goal_progress(total_spent, user.monthly_goal),
    })
}

/// Predict a user's next expense from their full history
pub fn predict_budget(db: &Database, user_id: i64) -> Result<Prediction> {
    let amounts = db.list_expense_amounts(user_id)?;
    Ok(predict_next(&amounts))
}

/// Evaluate the trend model on a user's full history
pub fn evaluate_budget_model(db: &Database, user_id: i64) -> Result<Option<ModelEvaluation>> {
    let amounts = db.list_expense_amounts(user_id)?;
    Ok(evaluate(&amounts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_goal_progress_zero_goal() {
        assert_eq!(goal_progress(0.0, 0.0), 0.0);
        assert_eq!(goal_progress(1000.0, 0.0), 0.0);
        assert_eq!(goal_progress(50.0, -10.0), 0.0);
    }

    #[test]
    fn test_goal_progress_clamped() {
        assert_eq!(goal_progress(100.0, 200.0), 50.0);
        assert_eq!(goal_progress(300.0, 200.0), 100.0);
        assert_eq!(goal_progress(0.0, 200.0), 0.0);
    }

    #[test]
    fn test_parse_goal() {
        assert_eq!(parse_goal(Some("250")).unwrap(), 250.0);
        assert_eq!(parse_goal(Some(" 99.5 ")).unwrap(), 99.5);
        assert_eq!(parse_goal(Some("-5")).unwrap(), -5.0);
        assert!(matches!(parse_goal(None), Err(Error::InvalidGoalValue(_))));
        assert!(matches!(parse_goal(Some("  ")), Err(Error::InvalidGoalValue(_))));
        assert!(matches!(parse_goal(Some("lots")), Err(Error::InvalidGoalValue(_))));
    }

    #[test]
    fn test_fit_exact_line() {
        let fit = fit_linear(&[10.0, 20.0, 30.0]).unwrap();
        assert!(approx(fit.slope, 10.0));
        assert!(approx(fit.intercept, 10.0));
        assert_eq!(predict_next(&[10.0, 20.0, 30.0]), Prediction::Predicted(40.0));
    }

    #[test]
    fn test_predict_insufficient_data() {
        assert_eq!(predict_next(&[]), Prediction::InsufficientData);
        assert_eq!(predict_next(&[42.0]), Prediction::InsufficientData);
        assert!(fit_linear(&[42.0]).is_none());
    }

    #[test]
    fn test_predict_two_points_and_negative() {
        // Line through (0, 5) and (1, 15) predicts 25 at x = 2
        assert!(approx(predict_next(&[5.0, 15.0]).value().unwrap(), 25.0));
        // Falling trend extrapolates below zero without clamping
        assert!(approx(predict_next(&[30.0, 10.0]).value().unwrap(), -10.0));
    }

    #[test]
    fn test_predict_noisy_least_squares() {
        // x = 0..3, y = [1, 3, 2, 4]: slope 0.8, intercept 1.3, prediction 4.5
        let fit = fit_linear(&[1.0, 3.0, 2.0, 4.0]).unwrap();
        assert!(approx(fit.slope, 0.8));
        assert!(approx(fit.intercept, 1.3));
        assert!(approx(predict_next(&[1.0, 3.0, 2.0, 4.0]).value().unwrap(), 4.5));
    }

    #[test]
    fn test_prediction_serialization() {
        let json = serde_json::to_value(Prediction::Predicted(40.0)).unwrap();
        assert_eq!(json, serde_json::json!(40.0));

        let json = serde_json::to_value(Prediction::InsufficientData).unwrap();
        assert_eq!(json, serde_json::json!(INSUFFICIENT_DATA_MESSAGE));
    }

    #[test]
    fn test_evaluate() {
        assert!(evaluate(&[1.0]).is_none());

        let exact = evaluate(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(exact.mean_absolute_error, 0.0);
        assert_eq!(exact.root_mean_squared_error, 0.0);

        // Residuals for [1, 3, 2, 4] are [0.3, -0.9, 0.9, -0.3]
        let noisy = evaluate(&[1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(noisy.mean_absolute_error, 0.6);
        assert_eq!(noisy.root_mean_squared_error, 0.67);
    }

    #[test]
    fn test_predict_budget_uses_insertion_order() {
        let db = Database::in_memory().unwrap();
        let user = auth::register(&db, "gwen", "pw").unwrap();

        // Dates ascend while amounts descend; the index-based fit sees the descent
        ledger::add_expense(&db, user.id, "2024-01-01", "food", "30", "").unwrap();
        ledger::add_expense(&db, user.id, "2024-01-02", "food", "20", "").unwrap();
        ledger::add_expense(&db, user.id, "2024-01-03", "food", "10", "").unwrap();

        let prediction = predict_budget(&db, user.id).unwrap();
        assert!(approx(prediction.value().unwrap(), 0.0));

        // Inserting an older-dated record still lands at the end of the sequence
        ledger::add_expense(&db, user.id, "2023-06-01", "food", "0", "").unwrap();
        let prediction = predict_budget(&db, user.id).unwrap();
        assert!(approx(prediction.value().unwrap(), -10.0));
    }

    #[test]
    fn test_month_summary() {
        let db = Database::in_memory().unwrap();
        let user = auth::register(&db, "hana", "pw").unwrap();
        db.set_monthly_goal(user.id, 200.0).unwrap();
        let user = db.get_user(user.id).unwrap().unwrap();

        ledger::add_expense(&db, user.id, "2024-05-02", "food", "100", "").unwrap();
        ledger::add_expense(&db, user.id, "2024-04-30", "food", "500", "").unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let summary = month_summary(&db, &user, today).unwrap();
        assert_eq!(summary.total_spent, 100.0);
        assert_eq!(summary.monthly_goal, 200.0);
        assert_eq!(summary.progress_percentage, 50.0);
    }
}
