use axum::{extract::State, response::Html, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::constants::{SESSION_COOKIE, SESSION_TTL_SECS};
use crate::error::{AppError, Result};
use crate::security::{issue_session_token, verify_session_token};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Log in with the configured admin credentials.
///
/// On success a signed session cookie is set; its value is self-contained
/// (username, expiry, HMAC) so no server-side session store is needed.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>)> {
    if payload.username != state.config.admin_username
        || payload.password != state.config.admin_password
    {
        tracing::warn!(username = %payload.username, "Rejected login attempt");
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_session_token(
        &payload.username,
        SESSION_TTL_SECS,
        &state.config.session_secret,
    );
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build();

    tracing::info!(username = %payload.username, "User logged in");

    Ok((jar.add(cookie), Json(json!({ "status": "success" }))))
}

/// Clear the session cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(cookie), Json(json!({ "status": "success" })))
}

/// Session-gated dashboard page.
pub async fn dashboard_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>> {
    require_session(&state, &jar)?;

    let page = tokio::fs::read_to_string("static/dashboard.html").await?;
    Ok(Html(page))
}

/// Extract and verify the session cookie, returning the logged-in
/// username.
fn require_session(state: &AppState, jar: &CookieJar) -> Result<String> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| verify_session_token(cookie.value(), &state.config.session_secret))
        .ok_or(AppError::Unauthorized)
}
