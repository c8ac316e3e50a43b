use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{server::AppState, views};

pub const INVALID_LINK: &str = "Invalid URL...Please check the URL and try again";

#[derive(Debug, Deserialize)]
pub struct ResolveForm {
    pub url: Option<String>,
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Html(views::index_page(Some(message)))).into_response()
}

/// Resolves a pasted link and renders the matching catalog record.
pub async fn resolve(State(state): State<AppState>, Form(form): Form<ResolveForm>) -> Response {
    let Some(url) = form.url.filter(|u| !u.trim().is_empty()) else {
        return bad_request("No link provided");
    };

    let Some(link) = state.resolver.resolve(&url).await else {
        tracing::info!(url = %url, "link could not be resolved");
        return bad_request(INVALID_LINK);
    };

    match state.catalog.lookup(&link).await {
        Ok(record) => Html(views::catalog_page(&record)).into_response(),
        Err(e) => {
            tracing::warn!(
                entity_type = %link.entity_type,
                entity_id = %link.entity_id,
                error = %e,
                "catalog lookup failed"
            );
            bad_request(&format!("Could not load this {}: {}", link.entity_type, e))
        }
    }
}
