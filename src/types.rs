use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The catalog entity kinds a link can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Track,
    Album,
    Playlist,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Track => "track",
            EntityType::Album => "album",
            EntityType::Playlist => "playlist",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(EntityType::Track),
            "album" => Ok(EntityType::Album),
            "playlist" => Ok(EntityType::Playlist),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

/// A link normalized to its catalog entity. The id is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub entity_type: EntityType,
    pub entity_id: String,
}

/// User-scoped OAuth token kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) at which the access token expires.
    pub expires_at: i64,
    pub scope: String,
}

/// Token endpoint response for both the code exchange and the refresh grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
    pub id: Option<String>,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub image_url: Option<String>,
    pub is_playing: bool,
    pub progress_ms: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTrack {
    pub track: TrackSnapshot,
    pub lyrics: String,
    pub commentary: String,
}

/// Result of the enrichment pipeline for one track.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub lyrics: String,
    pub commentary: String,
}

// Spotify Web API objects. Only the fields the views need are modelled and
// everything that may be missing or null for local/unavailable items is
// optional.

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub track_number: u32,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumObject {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub tracks: Page<TrackObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistObject {
    pub name: String,
    pub owner: Owner,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub followers: Option<Followers>,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    pub tracks: Page<PlaylistItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub name: String,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<Page<Option<SearchItem>>>,
    #[serde(default)]
    pub albums: Option<Page<Option<SearchItem>>>,
    #[serde(default)]
    pub playlists: Option<Page<Option<SearchItem>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub item: Option<TrackObject>,
}

// Display records.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRow {
    pub id: Option<String>,
    pub name: String,
    pub track_number: u32,
    pub artist: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumRecord {
    pub name: String,
    pub id: String,
    pub artist: String,
    pub total_tracks: u32,
    pub release_date: String,
    pub label: String,
    pub image: Option<String>,
    pub tracks: Vec<TrackRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecord {
    pub track_name: String,
    pub track_id: String,
    pub track_artist: String,
    pub track_album: String,
    pub image: Option<String>,
    pub track_explicit: String,
    pub track_release_date: String,
    pub track_popularity: u32,
    pub track_number: u32,
    pub track_duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistRecord {
    pub name: String,
    pub id: String,
    pub owner: String,
    pub total_tracks: u64,
    pub desc: String,
    pub followers: u64,
    pub image: Option<String>,
    pub tracks: Vec<TrackRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackListingEntry {
    pub name: String,
    pub track_number: u32,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    pub duration: String,
}

/// Track id -> listing entry for a whole album or playlist.
pub type TrackListing = BTreeMap<String, TrackListingEntry>;

/// A shaped catalog record, one variant per entity type.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRecord {
    Track(TrackRecord),
    Album(AlbumRecord),
    Playlist(PlaylistRecord),
}
