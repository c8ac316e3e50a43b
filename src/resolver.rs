//! Link resolution.
//!
//! Turns an arbitrary user supplied link into a catalog entity. The chain is:
//! direct match, redirect following, shortener page scraping and finally the
//! link aggregation API. Every failure along the way collapses to `None`.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use serde_json::{Value, json};
use url::Url;

use crate::{config::Config, error::AppError, types::ResolvedLink};

static CANONICAL_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:spotify:(track|album|playlist):|https://[a-z]+\.spotify\.com/(?:intl-[a-zA-Z-]+/)?(track|playlist|album)/)([A-Za-z0-9]+)?.*$",
    )
    .expect("canonical link regex")
});

static SHORTENER_REDIRECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"window\.top\.location = validateProtocol\("(\S+)"\);"#)
        .expect("shortener redirect regex")
});

pub const SHORTENER_HOSTS: [&str; 2] = ["spotify.link", "spotify.app.link"];

/// Matches `link` against the three canonical forms.
///
/// Exactly one of the two entity type groups is populated on a match. A match
/// without an id is treated as unresolved.
pub fn parse_canonical(link: &str) -> Option<ResolvedLink> {
    let caps = CANONICAL_LINK.captures(link.trim())?;
    let entity_type = caps.get(2).or_else(|| caps.get(1))?.as_str().parse().ok()?;
    let entity_id = caps.get(3)?.as_str();
    if entity_id.is_empty() {
        return None;
    }
    Some(ResolvedLink {
        entity_type,
        entity_id: entity_id.to_string(),
    })
}

/// Extracts the destination embedded in a link shortener landing page.
pub fn extract_shortener_target(body: &str) -> Option<String> {
    SHORTENER_REDIRECT
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub struct LinkResolver {
    client: Client,
    aggregator_url: String,
    country: String,
    shortener_hosts: Vec<String>,
}

impl LinkResolver {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            aggregator_url: config.aggregator_api_url.clone(),
            country: config.aggregator_country.clone(),
            shortener_hosts: SHORTENER_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Replaces the hosts treated as link shorteners.
    pub fn with_shortener_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shortener_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Resolves `link` to a track, album or playlist.
    ///
    /// Returns `None` when the link cannot be mapped to a Spotify entity or
    /// when any network call on the way fails.
    pub async fn resolve(&self, link: &str) -> Option<ResolvedLink> {
        let link = link.trim();
        if link.is_empty() {
            return None;
        }
        if let Some(resolved) = parse_canonical(link) {
            return Some(resolved);
        }

        let destination = match self.follow(link).await {
            Ok(destination) => destination,
            Err(e) => {
                tracing::info!(link, error = %e, "could not follow link");
                return None;
            }
        };
        if let Some(resolved) = parse_canonical(&destination) {
            return Some(resolved);
        }

        match self.aggregate(&destination).await {
            Ok(spotify_link) => {
                let resolved = parse_canonical(&spotify_link);
                if resolved.is_none() {
                    tracing::info!(
                        link,
                        spotify_link = %spotify_link,
                        "aggregator link is not canonical"
                    );
                }
                resolved
            }
            Err(e) => {
                tracing::info!(link, error = %e, "aggregator could not resolve link");
                None
            }
        }
    }

    /// Follows redirects and, for shortener pages, the embedded script redirect.
    async fn follow(&self, link: &str) -> Result<String, AppError> {
        let parsed = Url::parse(link).map_err(|_| AppError::UnresolvedLink)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::UnresolvedLink);
        }

        let response = self.client.get(parsed).send().await?;
        let final_url = response.url().clone();
        tracing::debug!(link, destination = %final_url, "followed redirects");

        if !self.is_shortener(&final_url) {
            return Ok(final_url.to_string());
        }

        let body = response.text().await?;
        match extract_shortener_target(&body) {
            Some(target) => Ok(target),
            None => Ok(final_url.to_string()),
        }
    }

    fn is_shortener(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        self.shortener_hosts
            .iter()
            .any(|s| host == s || host.ends_with(&format!(".{s}")))
    }

    /// Asks the aggregation API for the Spotify equivalent of `link`.
    async fn aggregate(&self, link: &str) -> Result<String, AppError> {
        let payload = json!({ "url": link, "country": self.country });
        let response = self
            .client
            .post(&self.aggregator_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "aggregator answered {status}"
            )));
        }

        let body: Value = response.json().await?;
        body.pointer("/data/item/links/spotify/0/link")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(AppError::UnresolvedLink)
    }
}
