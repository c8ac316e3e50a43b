use axum::{
    extract::State,
    response::{Html, Redirect, Response},
};

use crate::{
    api::{login::login_location, session::with_session_cookie},
    error::AppError,
    management::{Session, SessionToken, SessionTokenManager},
    server::AppState,
    views,
};

pub const NOTHING_PLAYING: &str = "Nothing is playing on Spotify right now or the player could not be read. Start a track in Spotify and refresh.";

/// GET /now-playing - Current track with lyrics and interpretation.
pub async fn now_playing(State(state): State<AppState>, session: Session) -> Response {
    let token = match SessionTokenManager::new(&state.oauth).ensure(&session).await {
        SessionToken::Valid(token) => token,
        SessionToken::Absent => {
            tracing::info!("no token in session, redirecting to login");
            return with_session_cookie(&session, Redirect::to(&login_location(None)));
        }
        SessionToken::Invalidated(reason) => {
            return with_session_cookie(&session, Redirect::to(&login_location(Some(&reason))));
        }
    };

    match state.oauth.currently_playing(&token).await {
        Ok(Some(track)) => {
            let enriched = state.enrichment.enrich_track(track).await;
            with_session_cookie(&session, Html(views::now_playing_page(&enriched)))
        }
        Ok(None) => with_session_cookie(
            &session,
            Html(views::nothing_playing_page(NOTHING_PLAYING)),
        ),
        Err(AppError::Refresh(reason)) => {
            tracing::warn!(
                reason = %reason,
                "provider rejected the session token, clearing session"
            );
            session.clear().await;
            let location = login_location(Some("Your session expired, please sign in again."));
            with_session_cookie(&session, Redirect::to(&location))
        }
        Err(e) => {
            tracing::warn!(error = %e, "currently playing lookup failed");
            with_session_cookie(&session, Html(views::nothing_playing_page(NOTHING_PLAYING)))
        }
    }
}
