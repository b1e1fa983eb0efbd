//! Session cookies, the current-user extractor and flash notices
//!
//! The session cookie carries a random token; the database stores only its
//! digest. Flash notices ride in a second cookie as URL-encoded JSON and are
//! cleared by the next view that displays them.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pennywise_core::models::User;

use crate::{AppError, AppState};

/// Session cookie name
pub const SESSION_COOKIE: &str = "pennywise_session";

/// Flash cookie name
pub const FLASH_COOKIE: &str = "pennywise_flash";

/// Notice shown when a gated route is hit without a valid session
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Find a cookie value in the request headers
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// `Set-Cookie` value establishing a session
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that deletes a cookie
pub fn expired_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}

/// Append a `Set-Cookie` header to a response
pub fn append_cookie(response: &mut Response, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "Refusing to send malformed cookie"),
    }
}

// ============================================================================
// Flash notices
// ============================================================================

/// Flash severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Error,
    Info,
}

/// A one-shot user-visible notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: &str) -> Self {
        Self {
            category: FlashCategory::Success,
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            category: FlashCategory::Error,
            message: message.to_string(),
        }
    }

    pub fn info(message: &str) -> Self {
        Self {
            category: FlashCategory::Info,
            message: message.to_string(),
        }
    }
}

/// Flashes pending for the current request (read from the flash cookie)
#[derive(Debug, Clone, Default)]
pub struct Flashes(Vec<Flash>);

impl Flashes {
    /// Decode pending flashes; a missing or garbled cookie yields none
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let flashes = get_cookie(headers, FLASH_COOKIE)
            .and_then(|raw| urlencoding::decode(raw).ok())
            .and_then(|json| serde_json::from_str::<Vec<Flash>>(&json).ok())
            .unwrap_or_default();
        Self(flashes)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Flash] {
        &self.0
    }

    /// Queue another notice
    pub fn push(mut self, flash: Flash) -> Self {
        self.0.push(flash);
        self
    }

    fn to_cookie(&self) -> String {
        let json = serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string());
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            FLASH_COOKIE,
            urlencoding::encode(&json)
        )
    }

    /// Redirect (303) carrying all queued notices to the next view
    pub fn redirect(self, to: &str) -> Response {
        let mut response = Redirect::to(to).into_response();
        if !self.is_empty() {
            append_cookie(&mut response, &self.to_cookie());
        }
        response
    }

    /// Render a JSON view that includes and consumes the pending notices
    pub fn view<T: Serialize>(self, body: T) -> Response {
        #[derive(Serialize)]
        struct View<T> {
            #[serde(flatten)]
            body: T,
            flashes: Vec<Flash>,
        }

        let consumed = !self.is_empty();
        let mut response = Json(View {
            body,
            flashes: self.0,
        })
        .into_response();
        if consumed {
            append_cookie(&mut response, &expired_cookie(FLASH_COOKIE));
        }
        response
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flashes
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

// ============================================================================
// Identity gate
// ============================================================================

/// The authenticated user for this request, resolved once from the session cookie
///
/// Using this extractor gates a handler: requests without a live session are
/// redirected to `/login`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Raw session token (needed to end the session on logout)
    pub token: String,
}

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }
}

/// Look up a live session and its user; expired sessions are deleted
fn resolve_session(state: &AppState, token: &str) -> pennywise_core::Result<Option<User>> {
    let Some(session) = state.db.get_session(token)? else {
        return Ok(None);
    };

    if session.is_expired(state.config.session_ttl, chrono::Utc::now()) {
        debug!(user_id = session.user_id, "Session expired");
        state.db.delete_session(token)?;
        return Ok(None);
    }

    state.db.get_user(session.user_id)
}

fn login_required(headers: &HeaderMap, had_cookie: bool) -> Response {
    let mut response = Flashes::from_headers(headers)
        .push(Flash::info(LOGIN_REQUIRED_MESSAGE))
        .redirect("/login");
    if had_cookie {
        append_cookie(&mut response, &expired_cookie(SESSION_COOKIE));
    }
    response
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = get_cookie(&parts.headers, SESSION_COOKIE).map(str::to_string) else {
            return Err(login_required(&parts.headers, false));
        };

        match resolve_session(state, &token) {
            Ok(Some(user)) => Ok(Self { user, token }),
            Ok(None) => Err(login_required(&parts.headers, true)),
            Err(e) => Err(AppError::from(e).into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_get_cookie() {
        let headers = headers_with_cookie("a=1; pennywise_session=abc; b=2");
        assert_eq!(get_cookie(&headers, SESSION_COOKIE), Some("abc"));
        assert_eq!(get_cookie(&headers, "b"), Some("2"));
        assert_eq!(get_cookie(&headers, "missing"), None);
        assert_eq!(get_cookie(&HeaderMap::new(), SESSION_COOKIE), None);
    }

    #[test]
    fn test_session_cookie_flags() {
        assert_eq!(
            session_cookie("tok", false),
            "pennywise_session=tok; Path=/; HttpOnly; SameSite=Lax"
        );
        assert!(session_cookie("tok", true).ends_with("; Secure"));
        assert!(expired_cookie(FLASH_COOKIE).contains("Max-Age=0"));
    }

    #[test]
    fn test_flash_cookie_round_trip() {
        let flashes = Flashes::default()
            .push(Flash::error("Username already exists"))
            .push(Flash::success("Registration successful; welcome!"));
        let set_cookie = flashes.to_cookie();

        // Browser sends back only the name=value part
        let pair = set_cookie.split(';').next().unwrap();
        let decoded = Flashes::from_headers(&headers_with_cookie(pair));
        assert_eq!(decoded.as_slice(), flashes.as_slice());
    }

    #[test]
    fn test_garbled_flash_cookie_is_ignored() {
        let decoded = Flashes::from_headers(&headers_with_cookie("pennywise_flash=%7Bnot-json"));
        assert!(decoded.is_empty());
    }
}
