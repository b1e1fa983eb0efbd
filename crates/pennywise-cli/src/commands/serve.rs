//! Server command implementation

use std::path::Path;

use anyhow::{bail, Result};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: Option<u16>,
    debug: bool,
    secure_cookies: bool,
    session_hours: i64,
) -> Result<()> {
    if session_hours <= 0 {
        bail!("--session-hours must be positive (got {})", session_hours);
    }

    let env_port = std::env::var(pennywise_server::PORT_ENV).ok();
    let port = pennywise_server::resolve_port(port, env_port.as_deref());

    println!("🚀 Starting Pennywise web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Sessions expire after {} hour(s)", session_hours);
    if secure_cookies {
        println!("   🔒 Session cookie marked Secure (HTTPS only)");
    }
    if debug {
        println!("   ⚠️  Debug mode - internal errors are shown to clients");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let config = pennywise_server::ServerConfig {
        debug,
        secure_cookies,
        session_ttl: chrono::Duration::hours(session_hours),
    };

    pennywise_server::serve_with_config(db, host, port, config).await?;

    Ok(())
}
