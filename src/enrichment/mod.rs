//! # Enrichment Module
//!
//! Adds lyrics and a generated interpretation to a now-playing track.
//!
//! ```text
//! TrackSnapshot
//!     ↓
//! Lyrics API (10s timeout)  ── failure ──> "not found" text, no commentary
//!     ↓
//! LLM completion API        ── failure ──> placeholder commentary
//!     ↓
//! EnrichedTrack
//! ```
//!
//! The pipeline never fails: every error kind is matched explicitly and
//! degraded to a message the view can show.

pub mod commentary;
pub mod lyrics;

use crate::{
    error::AppError,
    types::{EnrichedTrack, Enrichment, TrackSnapshot},
};

pub use commentary::CommentaryClient;
pub use lyrics::LyricsClient;

pub const LYRICS_NOT_FOUND: &str = "Lyrics could not be found or retrieved.";
pub const COMMENTARY_NOT_AVAILABLE: &str = "No interpretation has been generated for these lyrics.";
pub const LYRICS_NO_TRACK_ID: &str = "Lyrics could not be fetched because the track has no id.";

pub struct EnrichmentPipeline {
    lyrics: LyricsClient,
    commentary: CommentaryClient,
}

impl EnrichmentPipeline {
    pub fn new(lyrics: LyricsClient, commentary: CommentaryClient) -> Self {
        Self { lyrics, commentary }
    }

    pub fn commentary(&self) -> &CommentaryClient {
        &self.commentary
    }

    /// Fetches lyrics and, only if that worked, an interpretation.
    pub async fn enrich(&self, track_id: &str, track_name: &str, artist_name: &str) -> Enrichment {
        let lyrics = match self.lyrics.fetch(track_id).await {
            Ok(lyrics) => lyrics,
            Err(AppError::NoLyricsAvailable) => {
                tracing::info!(track_id, "no lyrics available");
                return not_found();
            }
            Err(e) => {
                tracing::warn!(track_id, error = %e, "lyrics lookup failed");
                return not_found();
            }
        };

        if track_name.is_empty() || artist_name.is_empty() {
            return Enrichment {
                lyrics,
                commentary: COMMENTARY_NOT_AVAILABLE.to_string(),
            };
        }

        let commentary = match self
            .commentary
            .interpret(&lyrics, track_name, artist_name)
            .await
        {
            Ok(text) => text,
            Err(AppError::CommentaryUnavailable(reason)) => {
                tracing::warn!(track_id, reason = %reason, "commentary unavailable");
                format!("The interpretation could not be generated: {reason}.")
            }
            Err(e) => {
                tracing::warn!(track_id, error = %e, "commentary failed");
                COMMENTARY_NOT_AVAILABLE.to_string()
            }
        };

        Enrichment { lyrics, commentary }
    }

    /// Enriches a snapshot; tracks without an id get placeholder texts.
    pub async fn enrich_track(&self, track: TrackSnapshot) -> EnrichedTrack {
        let enrichment = match track.id.as_deref() {
            Some(id) => self.enrich(id, &track.name, &track.artist).await,
            None => Enrichment {
                lyrics: LYRICS_NO_TRACK_ID.to_string(),
                commentary: COMMENTARY_NOT_AVAILABLE.to_string(),
            },
        };
        EnrichedTrack {
            track,
            lyrics: enrichment.lyrics,
            commentary: enrichment.commentary,
        }
    }
}

fn not_found() -> Enrichment {
    Enrichment {
        lyrics: LYRICS_NOT_FOUND.to_string(),
        commentary: COMMENTARY_NOT_AVAILABLE.to_string(),
    }
}
