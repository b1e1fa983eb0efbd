//! Registration, login and logout handlers

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pennywise_core::{auth, Error};

use crate::session::{
    append_cookie, expired_cookie, session_cookie, CurrentUser, Flash, Flashes, SESSION_COOKIE,
};
use crate::{AppError, AppState};

/// Form body shared by `/register` and `/login`
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of the unauthenticated form views
#[derive(Serialize)]
struct FormView {
    form: &'static str,
    fields: [&'static str; 2],
}

const CREDENTIAL_FIELDS: [&str; 2] = ["username", "password"];

/// GET /register
pub async fn register_form(flashes: Flashes) -> Response {
    flashes.view(FormView {
        form: "register",
        fields: CREDENTIAL_FIELDS,
    })
}

/// POST /register - Create a new identity
pub async fn register(
    State(state): State<Arc<AppState>>,
    flashes: Flashes,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match auth::register(&state.db, &form.username, &form.password) {
        Ok(_) => Ok(flashes
            .push(Flash::success("Registration successful"))
            .redirect("/login")),
        Err(Error::DuplicateUser(_)) => Ok(flashes
            .push(Flash::error("Username already exists"))
            .redirect("/register")),
        Err(Error::InvalidCredentials) => Ok(flashes
            .push(Flash::error("Username and password are required"))
            .redirect("/register")),
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_form(flashes: Flashes) -> Response {
    flashes.view(FormView {
        form: "login",
        fields: CREDENTIAL_FIELDS,
    })
}

/// POST /login - Establish a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    flashes: Flashes,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let user = match auth::verify(&state.db, &form.username, &form.password) {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            warn!(user = %form.username, "Failed login");
            return Ok(flashes
                .push(Flash::error("Invalid credentials"))
                .redirect("/login"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.db.create_session(user.id)?;
    info!(user = %user.username, "Logged in");

    let mut response = flashes.redirect("/");
    append_cookie(
        &mut response,
        &session_cookie(&token, state.config.secure_cookies),
    );
    Ok(response)
}

/// GET /logout - End the current session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Response, AppError> {
    state.db.delete_session(&current.token)?;
    info!(user = %current.user.username, "Logged out");

    let mut response = Redirect::to("/login").into_response();
    append_cookie(&mut response, &expired_cookie(SESSION_COOKIE));
    Ok(response)
}
