//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default database location, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "data/db/expenses.db";

/// Pennywise - Track expenses against a monthly goal
#[derive(Parser)]
#[command(name = "pennywise")]
#[command(about = "Self-hosted personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (parent directories are created)
    #[arg(long, default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = pennywise_server::DEFAULT_HOST)]
        host: String,

        /// Port to listen on (falls back to $PORT, then 8080)
        #[arg(short, long)]
        port: Option<u16>,

        /// Debug mode: debug logging and internal error detail in responses
        #[arg(long)]
        debug: bool,

        /// Only send the session cookie over HTTPS
        #[arg(long)]
        secure_cookies: bool,

        /// Session lifetime in hours
        #[arg(long, default_value_t = pennywise_server::DEFAULT_SESSION_HOURS)]
        session_hours: i64,
    },

    /// Register a new user
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Record an expense
    Add {
        /// Username
        #[arg(short, long)]
        user: String,

        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Category (free text)
        #[arg(short, long)]
        category: String,

        /// Amount
        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,

        /// Description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// List expenses, optionally filtered
    Expenses {
        /// Username
        #[arg(short, long)]
        user: String,

        /// Start date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Exact category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Set the monthly spending goal
    Goal {
        /// Username
        #[arg(short, long)]
        user: String,

        /// New goal amount
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Show current-month spend and goal progress
    Summary {
        /// Username
        #[arg(short, long)]
        user: String,
    },

    /// Predict the next expense and show how well the trend fits
    Predict {
        /// Username
        #[arg(short, long)]
        user: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Whether this invocation asked for debug-level logging
    pub fn wants_debug_logging(&self) -> bool {
        matches!(self, Commands::Serve { debug: true, .. })
    }
}
