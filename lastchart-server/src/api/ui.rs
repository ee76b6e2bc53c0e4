//! Server-rendered pages: login form and the handoff bridge

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::debug;

use crate::handoff::handoff_url;
use crate::AppState;

const LOGIN_HTML: &str = include_str!("../ui/login.html");
const HANDOFF_HTML: &str = include_str!("../ui/handoff.html");

/// GET /login
pub async fn login_page() -> Html<String> {
    Html(render_login(None))
}

/// Render the login form, optionally with an error banner
pub fn render_login(error: Option<&str>) -> String {
    let banner = match error {
        Some(message) => format!(r#"<div class="error">{}</div>"#, escape_html(message)),
        None => String::new(),
    };
    LOGIN_HTML.replace("<!--ERROR-->", &banner)
}

#[derive(Debug, Deserialize)]
pub struct HandoffParams {
    #[serde(default)]
    pub token: String,
}

/// GET /home?token=...
///
/// The transitional view between login and the web client. Renders the
/// user's identity and a prebuilt handoff URL; navigation happens in the
/// page via `location.replace`. An invalid or empty token goes back to
/// the login view instead of producing a broken handoff.
pub async fn handoff_page(
    State(state): State<AppState>,
    Query(params): Query<HandoffParams>,
) -> Response {
    let user = match state.auth.authenticate(&params.token).await {
        Ok(user) => user,
        Err(_) => {
            debug!("Handoff refused: token not valid");
            return Redirect::to("/login").into_response();
        }
    };

    let url = match handoff_url(&state.client_origin, &params.token, &user) {
        Ok(url) => url,
        Err(_) => return Redirect::to("/login").into_response(),
    };

    // The URL lands inside a script string literal where HTML entities are
    // not decoded; its components are already percent-encoded, so it goes
    // in raw.
    let page = HANDOFF_HTML
        .replace("__NAME__", &escape_html(&user.name))
        .replace("__EMAIL__", &escape_html(&user.email))
        .replace("__HANDOFF_URL__", &url)
        .replace("__TOKEN__", &escape_html(&params.token));

    Html(page).into_response()
}

/// Minimal HTML escaping for values substituted into the page templates
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
