//! Login session operations
//!
//! Tokens are handed to the client once and stored only as SHA-256 digests.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};

use super::{parse_datetime, Database};
use crate::error::Result;

/// A resolved session row
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is older than `ttl` at `now`
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at > ttl
    }
}

/// Digest a raw session token for storage/lookup
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

impl Database {
    /// Create a session for a user and return the raw token
    pub fn create_session(&self, user_id: i64) -> Result<String> {
        let conn = self.conn()?;
        let token = uuid::Uuid::new_v4().simple().to_string();

        conn.execute(
            "INSERT INTO sessions (token_hash, user_id) VALUES (?, ?)",
            params![hash_token(&token), user_id],
        )?;

        Ok(token)
    }

    /// Look up a session by raw token
    pub fn get_session(&self, token: &str) -> Result<Option<Session>> {
        let conn = self.conn()?;
        let session = conn
            .query_row(
                "SELECT user_id, created_at FROM sessions WHERE token_hash = ?",
                params![hash_token(token)],
                |row| {
                    let created_at_str: String = row.get(1)?;
                    Ok(Session {
                        user_id: row.get(0)?,
                        created_at: parse_datetime(&created_at_str),
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    /// Delete a session (logout). Unknown tokens are ignored.
    pub fn delete_session(&self, token: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?",
            params![hash_token(token)],
        )?;
        Ok(())
    }

    /// Remove sessions created more than `ttl` ago, returning how many were removed
    pub fn purge_expired_sessions(&self, ttl: Duration) -> Result<usize> {
        let conn = self.conn()?;
        let cutoff = (Utc::now() - ttl).format("%Y-%m-%d %H:%M:%S").to_string();
        let removed = conn.execute(
            "DELETE FROM sessions WHERE created_at < ?",
            params![cutoff],
        )?;
        Ok(removed)
    }
}
