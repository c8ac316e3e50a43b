use std::time::Duration;

use spotlyrics::config::{
    Config, DEFAULT_AGGREGATOR_COUNTRY, DEFAULT_OPENAI_MODEL, DEFAULT_REDIRECT_URI,
    DEFAULT_SERVER_ADDRESS,
};

/// A configuration with every upstream rooted at `base_url`.
///
/// Spotify's API lives under `/v1`, its token endpoint under `/api/token`,
/// the lyrics API under `/lyrics/`, the aggregator under `/aggregate` and
/// the LLM API under `/llm`.
pub fn test_config(base_url: &str) -> Config {
    let base = base_url.trim_end_matches('/');
    Config {
        server_address: DEFAULT_SERVER_ADDRESS.to_string(),
        spotify_client_id: "client-id".to_string(),
        spotify_client_secret: "client-secret".to_string(),
        spotify_redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        spotify_auth_url: format!("{base}/authorize"),
        spotify_token_url: format!("{base}/api/token"),
        spotify_api_url: format!("{base}/v1"),
        lyrics_api_url: format!("{base}/lyrics/"),
        aggregator_api_url: format!("{base}/aggregate"),
        aggregator_country: DEFAULT_AGGREGATOR_COUNTRY.to_string(),
        openai_api_key: Some("llm-key".to_string()),
        openai_api_url: format!("{base}/llm"),
        openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        http_timeout: Duration::from_secs(5),
        session_idle_ttl: Duration::from_secs(3600),
    }
}
