//! Pennywise Web Server
//!
//! Axum-based HTTP surface for the Pennywise expense tracker.
//!
//! - Form posts answer with `303 See Other` redirects and carry one-shot
//!   notices (flashes) in a cookie
//! - Views return JSON bodies that include any pending flashes
//! - Every route except `/register` and `/login` requires a session

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use pennywise_core::db::Database;

mod handlers;
pub mod session;

/// Default listen address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Port used when neither a flag nor `PORT` is given
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "PORT";

/// Default session lifetime in hours (one week)
pub const DEFAULT_SESSION_HOURS: i64 = 168;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Debug mode: internal error detail is included in 500 responses
    pub debug: bool,
    /// Mark the session cookie `Secure` (only sent over HTTPS)
    pub secure_cookies: bool,
    /// Sessions older than this are rejected and purged on startup
    pub session_ttl: chrono::Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            secure_cookies: false,
            session_ttl: chrono::Duration::hours(DEFAULT_SESSION_HOURS),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// Resolve the listen port: explicit flag, then `PORT`, then the default
pub fn resolve_port(flag: Option<u16>, env_value: Option<&str>) -> u16 {
    if let Some(port) = flag {
        return port;
    }
    match env_value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(value = raw, "Ignoring invalid {} value", PORT_ENV);
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    }
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    let debug = config.debug;
    let state = Arc::new(AppState { db, config });

    let mut app = Router::new()
        // Credential store
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        // Dashboard and goal
        .route("/", get(handlers::index))
        .route("/set_goal", post(handlers::set_goal))
        // Ledger
        .route("/add", post(handlers::add_expense))
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::filter_expenses),
        )
        // Prediction
        .route("/predict_budget", get(handlers::predict_budget))
        .route("/evaluate", get(handlers::evaluate_model))
        .with_state(state);

    if debug {
        app = app.layer(middleware::from_fn(expose_error_detail));
    }

    app.layer(TraceLayer::new_for_http())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server with default configuration
pub async fn serve(db: Database, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(db, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.debug {
        warn!("⚠️  Debug mode enabled - internal errors are returned to clients");
    }

    // Drop sessions that outlived their TTL while the server was down
    match db.purge_expired_sessions(config.session_ttl) {
        Ok(count) if count > 0 => info!("Purged {} expired session(s)", count),
        Ok(_) => {}
        Err(e) => warn!("Failed to purge expired sessions: {}", e),
    }

    let app = create_router(db, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

/// Full text of an internal error, attached to 500 responses for debug mode
#[derive(Clone)]
struct InternalErrorDetail(String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        let mut response = (self.status, body).into_response();
        if let Some(err) = self.internal {
            response
                .extensions_mut()
                .insert(InternalErrorDetail(format!("{:#}", err)));
        }
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

/// Debug-mode middleware: replace generic 500 bodies with the internal error
async fn expose_error_detail(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    match response.extensions().get::<InternalErrorDetail>() {
        Some(detail) => (
            response.status(),
            Json(serde_json::json!({
                "error": "An internal error occurred",
                "detail": detail.0,
            })),
        )
            .into_response(),
        None => response,
    }
}
