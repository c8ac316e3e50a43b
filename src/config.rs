//! Configuration management for the Spotify link & lyrics front end.
//!
//! This module handles loading configuration values from environment
//! variables and `.env` files and collects them into a [`Config`] value that
//! is passed explicitly to the services built at startup.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5000/callback";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_LYRICS_API_URL: &str = "https://spotify-lyrics-api-pi.vercel.app/";
pub const DEFAULT_AGGREGATOR_API_URL: &str = "https://songwhip.com/api/songwhip/create";
pub const DEFAULT_AGGREGATOR_COUNTRY: &str = "IN";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 24 * 60 * 60;

/// The only scope the authorization-code flow asks for.
pub const NOW_PLAYING_SCOPE: &str = "user-read-currently-playing";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration of the web front end.
///
/// Every upstream base URL is configurable so the whole application can be
/// pointed at mock servers.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
    pub spotify_api_url: String,
    pub lyrics_api_url: String,
    pub aggregator_api_url: String,
    pub aggregator_country: String,
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,
    pub http_timeout: Duration,
    /// Sessions not touched for this long are evicted from memory.
    pub session_idle_ttl: Duration,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the Spotify client credentials are
    /// not set and [`ConfigError::Invalid`] when `HTTP_TIMEOUT_SECS` or
    /// `SESSION_IDLE_TTL_SECS` is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = positive_secs("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let idle_ttl_secs =
            positive_secs("SESSION_IDLE_TTL_SECS", DEFAULT_SESSION_IDLE_TTL_SECS)?;

        Ok(Self {
            server_address: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            spotify_redirect_uri: or_default("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            spotify_auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            spotify_token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            spotify_api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL),
            lyrics_api_url: or_default("LYRICS_API_URL", DEFAULT_LYRICS_API_URL),
            aggregator_api_url: or_default("AGGREGATOR_API_URL", DEFAULT_AGGREGATOR_API_URL),
            aggregator_country: or_default("AGGREGATOR_COUNTRY", DEFAULT_AGGREGATOR_COUNTRY),
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_api_url: or_default("OPENAI_API_URL", DEFAULT_OPENAI_API_URL),
            openai_model: or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            http_timeout: Duration::from_secs(timeout_secs),
            session_idle_ttl: Duration::from_secs(idle_ttl_secs),
        })
    }
}

/// Loads environment variables from `.env` files.
///
/// Looks for a `.env` file in the working directory first and then in the
/// platform-specific local data directory under `spotlyrics/.env`. Variables
/// that are already set are never overwritten, and missing files are skipped.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotlyrics/.env`
/// - macOS: `~/Library/Application Support/spotlyrics/.env`
/// - Windows: `%LOCALAPPDATA%/spotlyrics/.env`
///
/// # Errors
///
/// Returns an error string if an existing `.env` file cannot be parsed.
pub fn load_env() -> Result<(), String> {
    match dotenv::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.to_string()),
    }

    let path = data_env_path();
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    }
    Ok(())
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotlyrics/.env");
    path
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn or_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn positive_secs(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match optional(key) {
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
        None => Ok(default),
    }
}
