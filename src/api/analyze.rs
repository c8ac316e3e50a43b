use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
}

/// POST /analyze-lyrics - On-demand interpretation of posted lyrics.
pub async fn analyze_lyrics(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<Value> {
    let lyrics = request.lyrics.unwrap_or_default();
    if lyrics.trim().is_empty() {
        return Json(json!({ "success": false, "error": "No lyrics were provided." }));
    }
    let track_name = request
        .track_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Unknown Track".to_string());
    let artist_name = request
        .artist_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Unknown Artist".to_string());

    match state
        .enrichment
        .commentary()
        .interpret(&lyrics, &track_name, &artist_name)
        .await
    {
        Ok(analysis) => Json(json!({ "success": true, "analysis": analysis })),
        Err(e) => {
            tracing::warn!(error = %e, "lyrics analysis failed");
            Json(json!({ "success": false, "error": e.to_string() }))
        }
    }
}
