//! Login, logout, and the bearer authentication middleware

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::AppState;

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Browser logout form; the token rides in a hidden field
#[derive(Debug, Deserialize)]
pub struct LogoutForm {
    #[serde(default)]
    pub token: String,
}

/// POST /login
///
/// Success redirects to the handoff view carrying the fresh token.
/// Failure re-renders the login form with the generic message only.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.auth.login(&form.email, &form.password).await {
        Ok(outcome) => {
            let location = format!("/home?token={}", urlencoding::encode(&outcome.token));
            Redirect::to(&location).into_response()
        }
        Err(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Html(super::ui::render_login(Some("Invalid email or password"))),
        )
            .into_response(),
        Err(e) => {
            error!("Login failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(super::ui::render_login(Some("Something went wrong"))),
            )
                .into_response()
        }
    }
}

/// POST /logout (browser flow)
///
/// Revokes the token if one was supplied, then returns to the login view.
pub async fn logout_form(
    State(state): State<AppState>,
    Form(form): Form<LogoutForm>,
) -> Response {
    if !form.token.is_empty() {
        if let Err(e) = state.auth.logout(&form.token).await {
            error!("Logout failed: {}", e);
        }
    }
    Redirect::to("/login").into_response()
}

/// POST /api/logout (bearer flow, used by the web client)
///
/// Revocation is idempotent: an unknown token still returns success.
/// A missing Authorization header is the only 401 case.
pub async fn logout_api(State(state): State<AppState>, request: Request) -> Response {
    let Some(token) = bearer_token(&request) else {
        return unauthorized();
    };

    match state.auth.logout(&token).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => {
            error!("Logout failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal error" })),
            )
                .into_response()
        }
    }
}

/// Bearer authentication middleware for /api routes
///
/// Returns 401 with a generic body for a missing, malformed, or revoked
/// token. The resolved user is attached to request extensions.
pub async fn bearer_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return unauthorized();
    };

    match state.auth.authenticate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(AuthError::Unauthenticated) => unauthorized(),
        Err(e) => {
            error!("Token lookup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal error" })),
            )
                .into_response()
        }
    }
}

/// Extract the bearer token from the Authorization header, if present
fn bearer_token(request: &Request) -> Option<String> {
    let value = request.headers().get(header::AUTHORIZATION)?;
    let value = value.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        warn!("Empty bearer token in Authorization header");
        return None;
    }
    Some(token.to_string())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthenticated" })),
    )
        .into_response()
}
