//! Error types for Pennywise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Username already exists: {0}")]
    DuplicateUser(String),

    /// Deliberately carries no detail: unknown user and wrong password look the same
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid monthly goal: {0:?}")]
    InvalidGoalValue(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// True for input/authentication failures that should be reported to the
    /// user rather than treated as a server fault
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUser(_)
                | Self::InvalidCredentials
                | Self::InvalidDate(_)
                | Self::InvalidAmount(_)
                | Self::InvalidGoalValue(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
