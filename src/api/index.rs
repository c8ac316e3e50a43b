use axum::{extract::Query, response::Html};
use serde::Deserialize;

use crate::views;

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    pub error: Option<String>,
}

pub async fn index(Query(params): Query<IndexParams>) -> Html<String> {
    Html(views::index_page(params.error.as_deref()))
}
