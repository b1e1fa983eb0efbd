//! Expense commands (add, list)

use anyhow::{Context, Result};
use pennywise_core::{db::Database, ledger};

use super::{find_user, truncate};

pub fn cmd_add(
    db: &Database,
    username: &str,
    date: &str,
    category: &str,
    amount: &str,
    description: &str,
) -> Result<()> {
    let user = find_user(db, username)?;

    let expense = ledger::add_expense(db, user.id, date, category, amount, description)
        .context("Failed to add expense")?;

    println!(
        "✅ Recorded {:.2} on {} ({}) as #{}",
        expense.amount, expense.date, expense.category, expense.id
    );
    Ok(())
}

pub fn cmd_expenses(
    db: &Database,
    username: &str,
    from: Option<&str>,
    to: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    let user = find_user(db, username)?;

    let expenses = ledger::query_expenses(db, user.id, from, to, category)
        .context("Failed to query expenses")?;

    if expenses.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }

    println!();
    println!(
        "{:>6}  {:10}  {:15}  {:>10}  Description",
        "ID", "Date", "Category", "Amount"
    );
    println!("{}", "─".repeat(70));

    for e in &expenses {
        println!(
            "{:>6}  {:10}  {:15}  {:>10.2}  {}",
            e.id,
            e.date,
            truncate(&e.category, 15),
            e.amount,
            truncate(&e.description, 30)
        );
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    println!("{}", "─".repeat(70));
    println!("{} expense(s), total {:.2}", expenses.len(), total);

    Ok(())
}
