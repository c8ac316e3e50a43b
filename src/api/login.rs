use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    api::session::expire_session_cookie, management::Session, server::AppState, views,
};

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub error: Option<String>,
}

/// Location of the login route carrying a message for the log.
pub fn login_location(error: Option<&str>) -> String {
    match error {
        Some(message) => {
            let encoded: String =
                url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
            format!("/login?error={encoded}")
        }
        None => "/login".to_string(),
    }
}

/// GET /login - Redirects to the provider's consent page.
pub async fn login(State(state): State<AppState>, Query(params): Query<LoginParams>) -> Response {
    if let Some(error) = params.error.as_deref() {
        tracing::info!(error, "re-authorization requested");
    }

    match state.oauth.authorize_url() {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "authorization URL is misconfigured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(views::index_page(Some("Spotify sign-in is not available."))),
            )
                .into_response()
        }
    }
}

/// GET /logout - Drops the session and returns to the landing page.
pub async fn logout(session: Session) -> Response {
    session.clear().await;
    expire_session_cookie(Redirect::to("/"))
}
