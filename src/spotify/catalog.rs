use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::AppError,
    spotify::check_status,
    types::{
        AlbumObject, AlbumRecord, CatalogRecord, EntityType, Page, PlaylistItem, PlaylistObject,
        PlaylistRecord, ResolvedLink, SearchHit, SearchItem, SearchResponse, TokenResponse,
        TrackListing, TrackListingEntry, TrackObject, TrackRecord, TrackRow,
    },
    utils::{first_image, format_duration, join_artists},
};

/// Page size used when listing the tracks of an album or playlist.
pub const PAGE_SIZE: usize = 50;

/// Entity types searched by `GET /api/search`.
pub const DEFAULT_SEARCH_TYPES: [EntityType; 3] =
    [EntityType::Track, EntityType::Album, EntityType::Playlist];

/// Catalog records join artists without a space.
const ARTIST_SEPARATOR: &str = ",";

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Spotify catalog client authorized with the client-credentials grant.
///
/// The app token is cached until shortly before it expires and shared by
/// all clones.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    api_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl CatalogClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.spotify_api_url.trim_end_matches('/').to_string(),
            token_url: config.spotify_token_url.clone(),
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    async fn app_token(&self) -> Result<String, AppError> {
        {
            let guard = self.token.read().await;
            if let Some(t) = guard.as_ref() {
                if t.expires_at > Instant::now() {
                    return Ok(t.access_token.clone());
                }
            }
        }

        let credentials = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        let response = self
            .client
            .post(&self.token_url)
            .header("Authorization", format!("Basic {}", credentials))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamUnavailable(format!(
                "client credentials token request failed: {status} => {body}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = u64::try_from(token.expires_in).unwrap_or(0).saturating_sub(60);
        let cached = CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        };
        *self.token.write().await = Some(cached.clone());
        Ok(cached.access_token)
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q, what: &str) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let token = self.app_token().await?;
        let response = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_status(response, what).await?;
        Ok(response.json::<T>().await?)
    }

    /// Fetches and shapes the record for a resolved link.
    pub async fn lookup(&self, link: &ResolvedLink) -> Result<CatalogRecord, AppError> {
        let id = link.entity_id.as_str();
        Ok(match link.entity_type {
            EntityType::Track => CatalogRecord::Track(self.get_track(id).await?),
            EntityType::Album => CatalogRecord::Album(self.get_album(id).await?),
            EntityType::Playlist => CatalogRecord::Playlist(self.get_playlist(id).await?),
        })
    }

    pub async fn get_album(&self, album_id: &str) -> Result<AlbumRecord, AppError> {
        let path = format!("/albums/{}", encode_id(album_id));
        let album: AlbumObject = self.get_json(&path, &[] as &[(&str, &str)], "album").await?;
        Ok(shape_album(album_id, album))
    }

    pub async fn get_track(&self, track_id: &str) -> Result<TrackRecord, AppError> {
        let path = format!("/tracks/{}", encode_id(track_id));
        let track: TrackObject = self.get_json(&path, &[] as &[(&str, &str)], "track").await?;
        Ok(shape_track(track_id, track))
    }

    pub async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistRecord, AppError> {
        let path = format!("/playlists/{}", encode_id(playlist_id));
        let playlist: PlaylistObject = self
            .get_json(&path, &[] as &[(&str, &str)], "playlist")
            .await?;
        Ok(shape_playlist(playlist_id, playlist))
    }

    /// Searches the given entity types with one result per type.
    ///
    /// Types without a hit are left out of the result.
    pub async fn search(
        &self,
        query: &str,
        types: &[EntityType],
    ) -> Result<Vec<SearchHit>, AppError> {
        let types = types
            .iter()
            .map(EntityType::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let params = [("q", query), ("type", types.as_str()), ("limit", "1")];
        let data: SearchResponse = self.get_json("/search", &params, "search").await?;
        Ok(shape_search(data))
    }

    /// Lists every track of an album or playlist keyed by track id.
    ///
    /// Pages of [`PAGE_SIZE`] are requested until one comes back short.
    /// Items without an id (local or unavailable tracks) are skipped.
    pub async fn list_all_track_ids(
        &self,
        container_id: &str,
        is_album: bool,
    ) -> Result<TrackListing, AppError> {
        let kind = if is_album { "albums" } else { "playlists" };
        let path = format!("/{}/{}/tracks", kind, encode_id(container_id));
        let mut tracks = TrackListing::new();
        let mut offset = 0usize;

        loop {
            let params = [("offset", offset), ("limit", PAGE_SIZE)];
            let fetched = if is_album {
                let page: Page<TrackObject> = self.get_json(&path, &params, "album tracks").await?;
                let count = page.items.len();
                for track in page.items {
                    insert_listing_entry(&mut tracks, track, false);
                }
                count
            } else {
                let page: Page<PlaylistItem> =
                    self.get_json(&path, &params, "playlist tracks").await?;
                let count = page.items.len();
                for track in page.items.into_iter().filter_map(|item| item.track) {
                    insert_listing_entry(&mut tracks, track, true);
                }
                count
            };

            tracing::debug!(container_id, offset, fetched, "fetched track page");
            offset += PAGE_SIZE;
            if fetched < PAGE_SIZE {
                break;
            }
        }

        Ok(tracks)
    }
}

fn encode_id(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes()).collect()
}

fn insert_listing_entry(tracks: &mut TrackListing, track: TrackObject, with_album: bool) {
    let Some(id) = track.id.filter(|id| !id.is_empty()) else {
        return;
    };
    let album = if with_album {
        Some(
            track
                .album
                .as_ref()
                .and_then(|a| a.name.clone())
                .unwrap_or_default(),
        )
    } else {
        None
    };
    tracks.insert(
        id,
        TrackListingEntry {
            name: track.name,
            track_number: track.track_number,
            artist: join_artists(&track.artists, ARTIST_SEPARATOR),
            album,
            duration: format_duration(track.duration_ms),
        },
    );
}

fn track_row(track: TrackObject) -> TrackRow {
    TrackRow {
        artist: join_artists(&track.artists, ARTIST_SEPARATOR),
        duration: format_duration(track.duration_ms),
        id: track.id,
        name: track.name,
        track_number: track.track_number,
    }
}

pub fn shape_album(album_id: &str, album: AlbumObject) -> AlbumRecord {
    AlbumRecord {
        artist: join_artists(&album.artists, ARTIST_SEPARATOR),
        image: first_image(&album.images),
        name: album.name,
        id: album_id.to_string(),
        total_tracks: album.total_tracks,
        release_date: album.release_date,
        label: album.label.unwrap_or_default(),
        tracks: album.tracks.items.into_iter().map(track_row).collect(),
    }
}

pub fn shape_track(track_id: &str, track: TrackObject) -> TrackRecord {
    let album = track.album.as_ref();
    TrackRecord {
        track_artist: join_artists(&track.artists, ARTIST_SEPARATOR),
        track_album: album.and_then(|a| a.name.clone()).unwrap_or_default(),
        image: album.and_then(|a| first_image(&a.images)),
        track_release_date: album.and_then(|a| a.release_date.clone()).unwrap_or_default(),
        track_explicit: if track.explicit { "[E]" } else { "Not Explicit" }.to_string(),
        track_name: track.name,
        track_id: track_id.to_string(),
        track_popularity: track.popularity,
        track_number: track.track_number,
        track_duration: format_duration(track.duration_ms),
    }
}

pub fn shape_playlist(playlist_id: &str, playlist: PlaylistObject) -> PlaylistRecord {
    PlaylistRecord {
        image: playlist.images.as_deref().and_then(first_image),
        owner: playlist.owner.display_name.unwrap_or_default(),
        total_tracks: playlist.tracks.total,
        desc: playlist
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "No Description".to_string()),
        followers: playlist.followers.map_or(0, |f| f.total),
        name: playlist.name,
        id: playlist_id.to_string(),
        tracks: playlist
            .tracks
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .map(track_row)
            .collect(),
    }
}

pub fn shape_search(data: SearchResponse) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    let first = |page: Option<Page<Option<SearchItem>>>| {
        page.and_then(|p| p.items.into_iter().flatten().next())
    };

    if let Some(track) = first(data.tracks) {
        hits.push(SearchHit {
            image: track.album.as_ref().and_then(|a| first_image(&a.images)),
            name: track.name,
            kind: EntityType::Track,
        });
    }
    if let Some(album) = first(data.albums) {
        hits.push(SearchHit {
            image: album.images.as_deref().and_then(first_image),
            name: album.name,
            kind: EntityType::Album,
        });
    }
    if let Some(playlist) = first(data.playlists) {
        hits.push(SearchHit {
            image: playlist.images.as_deref().and_then(first_image),
            name: playlist.name,
            kind: EntityType::Playlist,
        });
    }
    hits
}
