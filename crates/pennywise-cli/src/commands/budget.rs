//! Goal, summary and prediction commands

use anyhow::{Context, Result};
use pennywise_core::budget::{self, Prediction, INSUFFICIENT_EVALUATION_MESSAGE};
use pennywise_core::db::Database;

use super::find_user;

pub fn cmd_goal(db: &Database, username: &str, value: &str) -> Result<()> {
    let user = find_user(db, username)?;
    let goal = budget::parse_goal(Some(value)).context("Goal must be a number")?;

    db.set_monthly_goal(user.id, goal)?;
    println!("✅ Monthly spending goal for '{}' set to {:.2}", user.username, goal);
    Ok(())
}

pub fn cmd_summary(db: &Database, username: &str) -> Result<()> {
    let user = find_user(db, username)?;
    let today = chrono::Local::now().date_naive();
    let summary = budget::month_summary(db, &user, today)?;

    println!();
    println!("📊 {} - {}", user.username, today.format("%B %Y"));
    println!("   Spent this month: {:.2}", summary.total_spent);
    if summary.monthly_goal > 0.0 {
        println!("   Monthly goal:     {:.2}", summary.monthly_goal);
        println!("   Progress:         {:.1}%", summary.progress_percentage);
    } else {
        println!("   No monthly goal set (pennywise goal -u {} AMOUNT)", user.username);
    }

    Ok(())
}

pub fn cmd_predict(db: &Database, username: &str, json: bool) -> Result<()> {
    let user = find_user(db, username)?;
    let prediction = budget::predict_budget(db, user.id)?;
    let evaluation = budget::evaluate_budget_model(db, user.id)?;

    if json {
        let output = serde_json::json!({
            "predicted_budget": prediction,
            "evaluation": evaluation,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    match prediction {
        Prediction::Predicted(value) => println!("🔮 Predicted next expense: {:.2}", value),
        Prediction::InsufficientData => println!("🔮 {}", budget::INSUFFICIENT_DATA_MESSAGE),
    }
    match evaluation {
        Some(e) => {
            println!("   Mean absolute error:     {:.2}", e.mean_absolute_error);
            println!("   Root mean squared error: {:.2}", e.root_mean_squared_error);
        }
        None => println!("   {}", INSUFFICIENT_EVALUATION_MESSAGE),
    }

    Ok(())
}
