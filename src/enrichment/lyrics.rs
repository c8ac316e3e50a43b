use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::{config::Config, error::AppError};

pub const LYRICS_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    lines: Vec<LyricsLine>,
}

#[derive(Debug, Deserialize)]
struct LyricsLine {
    #[serde(default)]
    words: Option<String>,
}

/// Client for the lyrics-by-track-id API.
pub struct LyricsClient {
    client: Client,
    base_url: String,
}

impl LyricsClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.lyrics_api_url.clone(),
        }
    }

    /// Fetches the lyrics of a track as plain text, one line per row.
    ///
    /// Timing information is dropped. The error flag and a response whose
    /// lines are missing or all blank give [`AppError::NoLyricsAvailable`].
    /// Transport and decoding failures are [`AppError::UpstreamUnavailable`].
    pub async fn fetch(&self, track_id: &str) -> Result<String, AppError> {
        if track_id.is_empty() {
            return Err(AppError::NoLyricsAvailable);
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("trackid", track_id), ("format", "lrc")])
            .timeout(LYRICS_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let data: LyricsResponse = response.json().await?;
        if data.error || data.lines.is_empty() {
            return Err(AppError::NoLyricsAvailable);
        }

        let lines: Vec<String> = data
            .lines
            .into_iter()
            .map(|line| line.words.unwrap_or_default())
            .collect();
        if lines.iter().all(|words| words.trim().is_empty()) {
            return Err(AppError::NoLyricsAvailable);
        }
        Ok(lines.join("\n"))
    }
}
