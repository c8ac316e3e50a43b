//! # Spotify Integration Module
//!
//! This module wraps the two ways the front end talks to the Spotify Web API:
//!
//! ```text
//! Handlers (api)
//!          ↓
//! Spotify Integration Layer
//!     ├── Catalog (client-credentials, public catalog reads)
//!     └── Authorization (authorization-code flow, currently playing)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ### Catalog Module
//!
//! [`catalog`] - App-level access not tied to any user:
//! - **Entity Lookups**: Albums, tracks and playlists shaped into display records
//! - **Search**: One hit per entity type
//! - **Track Listings**: Paginated listing of a container's tracks
//!
//! ### Authorization Module
//!
//! [`auth`] - User-scoped access through the authorization-code flow:
//! - **Authorize URL**: Redirect target for user consent
//! - **Code Exchange & Refresh**: Token endpoint calls
//! - **Now Playing**: The user's currently playing track
//!
//! ## Error Types
//!
//! All functions return [`AppError`]. A 400/404 answer for a catalog id is
//! `UpstreamNotFound`, transport failures and other non-success statuses are
//! `UpstreamUnavailable`.

pub mod auth;
pub mod catalog;

use reqwest::{Response, StatusCode};

use crate::error::AppError;

pub use auth::OAuthSessionManager;
pub use catalog::CatalogClient;

/// Passes successful responses through and classifies failures.
pub(crate) async fn check_status(response: Response, what: &str) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Err(AppError::UpstreamNotFound(
            format!("{what}: {status} => {body}"),
        )),
        _ => Err(AppError::UpstreamUnavailable(format!(
            "{what}: {status} => {body}"
        ))),
    }
}
