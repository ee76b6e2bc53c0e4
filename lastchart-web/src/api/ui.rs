//! Web client views: token capture, guarded catalog view, logout

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::catalog::{FetchFailure, FetchState};
use crate::session::UserDisplay;
use crate::AppState;

/// Handoff query parameters as they arrive on the client origin
#[derive(Debug, Deserialize)]
pub struct HandoffQuery {
    pub token: Option<String>,
    pub user: Option<String>,
}

/// GET /?token=..&user=..
///
/// Captures the handoff credential when both parameters are present, then
/// moves on to the catalog view. The redirect keeps the credential-bearing
/// URL out of the browsing path; without parameters this is just the entry
/// point and the guard on /artists sorts out where to go.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<HandoffQuery>,
) -> Response {
    if let (Some(token), Some(user)) = (params.token.as_deref(), params.user.as_deref()) {
        if token.is_empty() {
            warn!("Handoff arrived with an empty token; refusing capture");
            return login_target(&state).into_response();
        }
        if let Err(e) = state.session.capture(token, user) {
            warn!("Failed to persist session: {}", e);
        } else {
            debug!("Handoff captured, continuing to catalog view");
        }
    }

    Redirect::to("/artists").into_response()
}

/// GET /artists
///
/// Protected view. The guard runs before any catalog markup is built:
/// an unauthenticated visitor is redirected and never sees protected
/// content.
pub async fn artists_view(State(state): State<AppState>) -> Response {
    if !state.session.is_authenticated() {
        return login_target(&state).into_response();
    }

    let token = state.session.token();
    let fetch_state = state.catalog.fetch_all(token.as_deref()).await;
    let user = state.session.user();

    Html(render_artists_page(&fetch_state, user.as_ref())).into_response()
}

/// GET /login - the login form lives on the server origin
pub async fn login_redirect(State(state): State<AppState>) -> Redirect {
    login_target(&state)
}

/// POST /logout
///
/// Revokes the token upstream (best-effort), clears the local session,
/// and returns to the login view. Local and upstream lifetimes end
/// together even if the revocation call fails.
pub async fn logout(State(state): State<AppState>) -> Response {
    if let Some(token) = state.session.token() {
        let url = format!("{}/api/logout", state.server_url);
        let result = reqwest::Client::new().post(&url).bearer_auth(&token).send().await;
        if let Err(e) = result {
            warn!("Upstream logout failed, clearing local session anyway: {}", e);
        }
    }

    if let Err(e) = state.session.clear() {
        warn!("Failed to clear session: {}", e);
    }

    login_target(&state).into_response()
}

fn login_target(state: &AppState) -> Redirect {
    Redirect::to(&format!("{}/login", state.server_url))
}

/// Render the catalog view for the current fetch state
///
/// Loading, failure, empty, and populated states all render distinct
/// markup; the empty catalog message is not the loading indicator.
pub fn render_artists_page(state: &FetchState, user: Option<&UserDisplay>) -> String {
    let greeting = match user {
        Some(display) => format!("Signed in as {}", escape_html(display.display_name())),
        None => String::new(),
    };

    let content = match state {
        FetchState::Idle | FetchState::Pending => {
            r#"<p class="loading">Loading artists...</p>"#.to_string()
        }
        FetchState::Failure(FetchFailure::Unauthorized) => {
            r#"<p class="error">Not authorized - please log in again</p>"#.to_string()
        }
        FetchState::Failure(failure) => {
            format!(r#"<p class="error">{}</p>"#, escape_html(&failure.to_string()))
        }
        FetchState::Success(artists) if artists.is_empty() => {
            r#"<p class="empty">No artists in the catalog yet. Run an import first.</p>"#
                .to_string()
        }
        FetchState::Success(artists) => {
            let rows: String = artists
                .iter()
                .enumerate()
                .map(|(i, artist)| {
                    format!(
                        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                        i + 1,
                        escape_html(&artist.name),
                        artist.listeners
                    )
                })
                .collect();
            format!(
                "<table><thead><tr><th>#</th><th>Artist</th><th>Listeners</th></tr></thead>\
                 <tbody>{}</tbody></table>",
                rows
            )
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>LastChart - Top Artists</title></head>
<body>
    <h1>Top Artists</h1>
    <p>{}</p>
    {}
    <form action="/logout" method="POST"><button type="submit">Logout</button></form>
</body>
</html>"#,
        greeting, content
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
