//! User operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

/// Credential row for login verification (never serialized)
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user_id: i64,
    pub password_hash: String,
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let created_at_str: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        monthly_goal: row.get(2)?,
        created_at: parse_datetime(&created_at_str),
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl Database {
    /// Insert a new user with an already-hashed credential
    ///
    /// Fails with `DuplicateUser` when the name is taken, including when a
    /// concurrent insert wins the race and trips the UNIQUE constraint.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE username = ?",
                params![username],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Err(Error::DuplicateUser(username.to_string()));
        }

        match conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?, ?)",
            params![username, password_hash],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::DuplicateUser(username.to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid();
        conn.query_row(
            "SELECT id, username, monthly_goal, created_at FROM users WHERE id = ?",
            params![id],
            row_to_user,
        )
        .map_err(Into::into)
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, monthly_goal, created_at FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by username (exact, case-sensitive match)
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, monthly_goal, created_at FROM users WHERE username = ?",
                params![username],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Fetch the stored credential hash for a username
    pub fn get_credentials(&self, username: &str) -> Result<Option<StoredCredentials>> {
        let conn = self.conn()?;
        let creds = conn
            .query_row(
                "SELECT id, password_hash FROM users WHERE username = ?",
                params![username],
                |row| {
                    Ok(StoredCredentials {
                        user_id: row.get(0)?,
                        password_hash: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(creds)
    }

    /// Update a user's monthly spending goal
    ///
    /// The sign is not validated; a negative goal behaves like "no goal".
    pub fn set_monthly_goal(&self, user_id: i64, goal: f64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET monthly_goal = ? WHERE id = ?",
            params![goal, user_id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }
}
