use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    server::AppState,
    spotify::catalog::DEFAULT_SEARCH_TYPES,
    types::{SearchHit, TrackListing, TrackRecord},
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackListParams {
    pub id: Option<String>,
    pub album: Option<String>,
}

fn required(value: Option<String>) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("No arguments provided".to_string()))
}

/// GET /api/search - One hit per entity type.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, AppError> {
    let q = required(params.q)?;
    Ok(Json(state.catalog.search(&q, &DEFAULT_SEARCH_TYPES).await?))
}

/// GET /api/tracks/list - Every track of an album or playlist.
///
/// Any non-empty `album` value selects the album listing.
pub async fn list_tracks(
    State(state): State<AppState>,
    Query(params): Query<TrackListParams>,
) -> Result<Json<TrackListing>, AppError> {
    let id = required(params.id)?;
    let is_album = params.album.is_some_and(|a| !a.is_empty());
    Ok(Json(state.catalog.list_all_track_ids(&id, is_album).await?))
}

/// GET /api/tracks/{track_id} - Single track lookup.
pub async fn track_details(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> Result<Json<TrackRecord>, AppError> {
    state
        .catalog
        .get_track(&track_id)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::info!(track_id = %track_id, error = %e, "track lookup failed");
            AppError::BadRequest("Invalid Track ID".to_string())
        })
}
