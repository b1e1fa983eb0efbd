//! Credential store: registration and password verification
//!
//! Credentials are hashed with Argon2id and stored as PHC strings, so the
//! salt and parameters travel with each hash.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::User;

/// Hash a raw password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    // 16 random bytes from a v4 UUID
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| Error::PasswordHash(format!("Failed to create salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Check a raw password against a stored PHC hash
///
/// A malformed stored hash is treated as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is not a valid PHC string");
            false
        }
    }
}

/// Hash used to equalize verification cost when the username is unknown
fn dummy_hash() -> &'static str {
    use std::sync::OnceLock;
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        hash_password("pennywise-dummy-credential").unwrap_or_default()
    })
}

/// Register a new user
///
/// Fails with `DuplicateUser` if the name is taken (the existing credential
/// is left untouched) and with `InvalidCredentials` for a blank username or
/// password.
pub fn register(db: &Database, username: &str, password: &str) -> Result<User> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(Error::InvalidCredentials);
    }

    if db.get_user_by_username(username)?.is_some() {
        return Err(Error::DuplicateUser(username.to_string()));
    }

    let hash = hash_password(password)?;
    let user = db.create_user(username, &hash)?;

    info!(user = %user.username, id = user.id, "Registered user");
    Ok(user)
}

/// Verify a username/password pair and return the user on success
///
/// Unknown users and wrong passwords both yield `InvalidCredentials`, and
/// both run exactly one Argon2 verification.
pub fn verify(db: &Database, username: &str, password: &str) -> Result<User> {
    let creds = db.get_credentials(username)?;

    let (user_id, matched) = match creds {
        Some(creds) => (
            Some(creds.user_id),
            verify_password(password, &creds.password_hash),
        ),
        None => {
            verify_password(password, dummy_hash());
            (None, false)
        }
    };

    match (user_id, matched) {
        (Some(id), true) => db.get_user(id)?.ok_or(Error::InvalidCredentials),
        _ => Err(Error::InvalidCredentials),
    }
}
