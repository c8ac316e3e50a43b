//! Error taxonomy shared by the resolver, the Spotify clients and the
//! enrichment pipeline.
//!
//! Resolution and catalog failures surface as 4xx responses, token failures
//! are turned into re-authorization redirects by the handlers, and lyrics or
//! commentary failures never leave the enrichment pipeline.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("the link could not be resolved to a Spotify track, album or playlist")]
    UnresolvedLink,

    #[error("not found upstream: {0}")]
    UpstreamNotFound(String),

    #[error("upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("token refresh failed: {0}")]
    Refresh(String),

    #[error("no lyrics available")]
    NoLyricsAvailable,

    #[error("commentary unavailable: {0}")]
    CommentaryUnavailable(String),

    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnresolvedLink | AppError::UpstreamNotFound(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UpstreamUnavailable(_) | AppError::CommentaryUnavailable(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::NoLyricsAvailable => StatusCode::NOT_FOUND,
            AppError::TokenExchange(_) | AppError::Refresh(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
