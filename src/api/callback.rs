use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{api::session::with_session_cookie, management::Session, server::AppState, views};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// GET /callback - Completes the authorization-code flow.
///
/// On success the token is stored under a newly issued session id and the
/// user lands on the now-playing page. Provider errors and failed exchanges
/// clear the session.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    session: Session,
) -> Response {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "spotify authorization failed");
        session.clear().await;
        let message = format!("Spotify authorization failed: {error}");
        return (StatusCode::BAD_REQUEST, Html(views::index_page(Some(&message)))).into_response();
    }

    let Some(code) = params.code else {
        session.clear().await;
        return (
            StatusCode::BAD_REQUEST,
            Html(views::index_page(Some(
                "An unknown problem occurred during Spotify authorization.",
            ))),
        )
            .into_response();
    };

    match state.oauth.exchange_code(&code).await {
        Ok(token) => {
            let session = session.rotate().await;
            session.set_token(&token).await;
            tracing::info!("user token stored in a new session");
            with_session_cookie(&session, Redirect::to("/now-playing"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "token exchange failed");
            session.clear().await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(views::index_page(Some(
                    "Could not get a token from Spotify. Please try again.",
                ))),
            )
                .into_response()
        }
    }
}
