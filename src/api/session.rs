use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderValue,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};

use crate::{
    management::Session,
    server::AppState,
    utils::{generate_session_id, is_valid_session_id},
};

pub const SESSION_COOKIE: &str = "sid";

fn session_id_from_cookies(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && is_valid_session_id(value))
        .map(|(_, value)| value.to_string())
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = match session_id_from_cookies(parts) {
            Some(id) => Session::new(id, false, state.sessions.clone()),
            None => Session::new(generate_session_id(), true, state.sessions.clone()),
        };
        Ok(session)
    }
}

/// Adds the session cookie to `response` when the client does not have it yet.
pub fn with_session_cookie(session: &Session, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if session.is_new() {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            session.id()
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

/// Tells the client to drop its session cookie.
pub fn expire_session_cookie(response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}
