use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::{
    config::{Config, NOW_PLAYING_SCOPE},
    error::AppError,
    types::{CurrentlyPlayingResponse, TokenInfo, TokenResponse, TrackSnapshot},
    utils::{first_image, join_artists},
};

/// Seconds before the recorded expiry at which a token stops being valid.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Owns the authorization-code flow for user-scoped access.
///
/// The manager itself is stateless; tokens live in the caller's session and
/// are passed in and out explicitly.
pub struct OAuthSessionManager {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    api_url: String,
}

impl OAuthSessionManager {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.spotify_redirect_uri.clone(),
            auth_url: config.spotify_auth_url.clone(),
            token_url: config.spotify_token_url.clone(),
            api_url: config.spotify_api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds the provider URL the user is redirected to for consent.
    ///
    /// # Errors
    ///
    /// Fails only when the configured authorization URL is not a valid URL.
    pub fn authorize_url(&self) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&self.auth_url)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", NOW_PLAYING_SCOPE);
        Ok(url.to_string())
    }

    /// Exchanges an authorization code for a user token.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenInfo, AppError> {
        let response = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .await
            .map_err(|e| AppError::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TokenExchange(format!("{status} => {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::TokenExchange(e.to_string()))?;
        Ok(token_info(token, None))
    }

    /// True while the current time is before the expiry minus the margin.
    pub fn is_valid(&self, token: &TokenInfo) -> bool {
        Utc::now().timestamp() < token.expires_at - EXPIRY_MARGIN_SECS
    }

    /// Trades the stored refresh token for a new access token.
    ///
    /// The refresh token is carried over when the provider does not rotate it.
    pub async fn refresh(&self, token: &TokenInfo) -> Result<TokenInfo, AppError> {
        let Some(refresh_token) = token.refresh_token.as_deref() else {
            return Err(AppError::Refresh("no refresh token stored".to_string()));
        };

        let response = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await
            .map_err(|e| AppError::Refresh(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Refresh(format!("{status} => {body}")));
        }

        let refreshed: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Refresh(e.to_string()))?;
        Ok(token_info(refreshed, Some(token)))
    }

    async fn token_request(
        &self,
        form: &[(&str, &str)],
    ) -> Result<reqwest::Response, reqwest::Error> {
        let credentials = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        self.client
            .post(&self.token_url)
            .header("Authorization", format!("Basic {}", credentials))
            .form(form)
            .send()
            .await
    }

    /// Reads the user's currently playing track.
    ///
    /// The token must already be valid. Returns `Ok(None)` when nothing is
    /// playing or the player has no playable item. A rejected token is
    /// reported as [`AppError::Refresh`] so the caller re-authorizes.
    pub async fn currently_playing(
        &self,
        token: &TokenInfo,
    ) -> Result<Option<TrackSnapshot>, AppError> {
        let response = self
            .client
            .get(format!("{}/me/player/currently-playing", self.api_url))
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => return Ok(None),
            StatusCode::UNAUTHORIZED => {
                return Err(AppError::Refresh("access token rejected".to_string()));
            }
            status if !status.is_success() => {
                return Err(AppError::UpstreamUnavailable(format!(
                    "currently playing: {status}"
                )));
            }
            _ => {}
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let playing: CurrentlyPlayingResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::UpstreamUnavailable(format!("currently playing: {e}")))?;
        Ok(snapshot(playing))
    }
}

fn token_info(response: TokenResponse, previous: Option<&TokenInfo>) -> TokenInfo {
    TokenInfo {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .or_else(|| previous.and_then(|p| p.refresh_token.clone())),
        expires_at: Utc::now().timestamp() + response.expires_in,
        scope: response
            .scope
            .or_else(|| previous.map(|p| p.scope.clone()))
            .unwrap_or_default(),
    }
}

/// Flattens a currently-playing response, defaulting missing album fields.
pub fn snapshot(playing: CurrentlyPlayingResponse) -> Option<TrackSnapshot> {
    let item = playing.item?;
    let album = item.album.as_ref();
    Some(TrackSnapshot {
        artist: join_artists(&item.artists, ", "),
        album: album
            .and_then(|a| a.name.clone())
            .unwrap_or_else(|| "Unknown Album".to_string()),
        image_url: album.and_then(|a| first_image(&a.images)),
        id: item.id.filter(|id| !id.is_empty()),
        name: item.name,
        is_playing: playing.is_playing,
        progress_ms: playing.progress_ms.unwrap_or(0),
        duration_ms: item.duration_ms,
    })
}
