use std::{sync::Arc, time::Instant};

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use reqwest::Client;
use tokio::net::TcpListener;

use crate::{
    api,
    config::Config,
    enrichment::{CommentaryClient, EnrichmentPipeline, LyricsClient},
    management::{MemorySessionStore, SessionStore},
    resolver::LinkResolver,
    spotify::{CatalogClient, OAuthSessionManager},
};

/// Services shared by all handlers.
///
/// Everything is constructed once at startup and injected through axum's
/// state; there is no global client.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<LinkResolver>,
    pub catalog: Arc<CatalogClient>,
    pub oauth: Arc<OAuthSessionManager>,
    pub enrichment: Arc<EnrichmentPipeline>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Builds every service from `config` around one shared HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = http_client(config)?;
        let sessions = MemorySessionStore::with_idle_ttl(config.session_idle_ttl);
        Ok(Self::new(client, config, Arc::new(sessions)))
    }

    pub fn new(client: Client, config: &Config, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            resolver: Arc::new(LinkResolver::new(client.clone(), config)),
            catalog: Arc::new(CatalogClient::new(client.clone(), config)),
            oauth: Arc::new(OAuthSessionManager::new(client.clone(), config)),
            enrichment: Arc::new(EnrichmentPipeline::new(
                LyricsClient::new(client.clone(), config),
                CommentaryClient::new(client, config),
            )),
            sessions,
        }
    }
}

/// The outbound client. Every upstream call is bounded by the configured timeout.
pub fn http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/resolve", post(api::resolve))
        .route("/api/search", get(api::search))
        .route("/api/tracks/list", get(api::list_tracks))
        .route("/api/tracks/{track_id}", get(api::track_details))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/logout", get(api::logout))
        .route("/now-playing", get(api::now_playing))
        .route("/analyze-lyrics", post(api::analyze_lyrics))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "handled request"
    );
    response
}

/// Serves the router on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "web front end listening");
    }
    axum::serve(listener, router(state)).await
}
