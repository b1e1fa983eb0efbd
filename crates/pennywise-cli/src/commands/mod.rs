//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, find_user)
//! - `serve` - Web server command
//! - `users` - User registration
//! - `expenses` - Expense recording and listing
//! - `budget` - Goal, monthly summary and prediction commands

pub mod budget;
pub mod core;
pub mod expenses;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use budget::*;
pub use core::*;
pub use expenses::*;
pub use serve::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
