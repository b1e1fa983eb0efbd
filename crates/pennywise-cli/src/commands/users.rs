//! User commands

use anyhow::{bail, Result};
use pennywise_core::{auth, db::Database, Error};

pub fn cmd_register(db: &Database, username: &str, password: &str) -> Result<()> {
    match auth::register(db, username, password) {
        Ok(user) => {
            println!("✅ Registered user '{}' (id {})", user.username, user.id);
            Ok(())
        }
        Err(Error::DuplicateUser(name)) => bail!("Username already exists: {}", name),
        Err(Error::InvalidCredentials) => bail!("Username and password are required"),
        Err(e) => Err(e.into()),
    }
}
