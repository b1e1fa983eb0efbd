//! Pennywise CLI - Personal expense tracker
//!
//! Usage:
//!   pennywise init                          Initialize database
//!   pennywise register -u NAME -p PASS      Create a user
//!   pennywise add -u NAME -d DATE -c CAT -a AMOUNT
//!   pennywise predict -u NAME               Predict the next expense
//!   pennywise serve --port 8080             Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose/--debug flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose || cli.command.wants_debug_logging() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            host,
            port,
            debug,
            secure_cookies,
            session_hours,
        } => {
            commands::cmd_serve(&cli.db, &host, port, debug, secure_cookies, session_hours).await
        }
        Commands::Register { username, password } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_register(&db, &username, &password)
        }
        Commands::Add {
            user,
            date,
            category,
            amount,
            description,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_add(&db, &user, &date, &category, &amount, &description)
        }
        Commands::Expenses {
            user,
            from,
            to,
            category,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_expenses(
                &db,
                &user,
                from.as_deref(),
                to.as_deref(),
                category.as_deref(),
            )
        }
        Commands::Goal { user, value } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_goal(&db, &user, &value)
        }
        Commands::Summary { user } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_summary(&db, &user)
        }
        Commands::Predict { user, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_predict(&db, &user, json)
        }
    }
}
