mod common;

use common::test_config;
use mockito::{Matcher, Server};
use serde_json::json;
use spotlyrics::resolver::{LinkResolver, extract_shortener_target, parse_canonical};
use spotlyrics::types::{EntityType, ResolvedLink};

fn resolved(entity_type: EntityType, id: &str) -> Option<ResolvedLink> {
    Some(ResolvedLink {
        entity_type,
        entity_id: id.to_string(),
    })
}

fn resolver(base_url: &str) -> LinkResolver {
    LinkResolver::new(reqwest::Client::new(), &test_config(base_url))
}

#[test]
fn test_parse_canonical_forms() {
    assert_eq!(
        parse_canonical("spotify:track:4cOdK2wGLETKBW3PvgPWqT"),
        resolved(EntityType::Track, "4cOdK2wGLETKBW3PvgPWqT")
    );
    assert_eq!(
        parse_canonical("https://open.spotify.com/album/1ATL5GLyefJaxhQzSPVrLX"),
        resolved(EntityType::Album, "1ATL5GLyefJaxhQzSPVrLX")
    );
    assert_eq!(
        parse_canonical("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc"),
        resolved(EntityType::Playlist, "37i9dQZF1DXcBWIGoYBM5M")
    );
    assert_eq!(
        parse_canonical("spotify:album:abc123"),
        resolved(EntityType::Album, "abc123")
    );
}

#[test]
fn test_parse_canonical_intl_prefix() {
    assert_eq!(
        parse_canonical("https://open.spotify.com/intl-de/track/abc123?si=xyz"),
        resolved(EntityType::Track, "abc123")
    );
    assert_eq!(
        parse_canonical("https://open.spotify.com/intl-pt-BR/playlist/P1"),
        resolved(EntityType::Playlist, "P1")
    );
}

#[test]
fn test_parse_canonical_rejects() {
    // Missing id
    assert_eq!(parse_canonical("spotify:track:"), None);
    assert_eq!(parse_canonical("https://open.spotify.com/album/"), None);

    assert_eq!(parse_canonical("spotify:artist:abc123"), None);
    assert_eq!(parse_canonical("http://open.spotify.com/track/abc123"), None);
    assert_eq!(parse_canonical("https://music.apple.com/album/abc123"), None);
    assert_eq!(parse_canonical(""), None);
}

#[test]
fn test_extract_shortener_target() {
    let body = r#"<script>window.top.location = validateProtocol("https://open.spotify.com/track/abc123?si=1");</script>"#;
    assert_eq!(
        extract_shortener_target(body),
        Some("https://open.spotify.com/track/abc123?si=1".to_string())
    );
    assert_eq!(extract_shortener_target("<html></html>"), None);
}

#[tokio::test]
async fn test_resolve_canonical_without_network() {
    let mut server = Server::new_async().await;
    let aggregator = server
        .mock("POST", "/aggregate")
        .expect(0)
        .create_async()
        .await;

    let resolver = resolver(&server.url());
    assert_eq!(
        resolver.resolve("  spotify:playlist:P1  ").await,
        resolved(EntityType::Playlist, "P1")
    );
    aggregator.assert_async().await;
}

#[tokio::test]
async fn test_resolve_empty_and_non_http() {
    let server = Server::new_async().await;
    let resolver = resolver(&server.url());

    assert_eq!(resolver.resolve("").await, None);
    assert_eq!(resolver.resolve("   ").await, None);
    assert_eq!(resolver.resolve("not a link").await, None);
    assert_eq!(resolver.resolve("ftp://example.com/track/abc").await, None);
}

#[tokio::test]
async fn test_resolve_shortener_redirect_chain() {
    let mut server = Server::new_async().await;
    let landing = format!("{}/landing", server.url());

    let short = server
        .mock("GET", "/s/abc")
        .with_status(302)
        .with_header("location", &landing)
        .create_async()
        .await;
    let page = server
        .mock("GET", "/landing")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(
            r#"<html><script>window.top.location = validateProtocol("https://open.spotify.com/album/A1?si=share");</script></html>"#,
        )
        .create_async()
        .await;

    let resolver = resolver(&server.url()).with_shortener_hosts(["127.0.0.1"]);
    let link = format!("{}/s/abc", server.url());

    assert_eq!(
        resolver.resolve(&link).await,
        resolved(EntityType::Album, "A1")
    );
    short.assert_async().await;
    page.assert_async().await;
}

#[tokio::test]
async fn test_resolve_through_aggregator() {
    let mut server = Server::new_async().await;
    let link = format!("{}/music/some-song", server.url());

    let _music = server
        .mock("GET", "/music/some-song")
        .with_status(200)
        .with_body("<html>some other service</html>")
        .create_async()
        .await;
    let aggregator = server
        .mock("POST", "/aggregate")
        .match_body(Matcher::PartialJson(json!({ "url": link, "country": "IN" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": {
                    "item": {
                        "links": {
                            "spotify": [{ "link": "https://open.spotify.com/track/T42" }]
                        }
                    }
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let resolver = resolver(&server.url());
    assert_eq!(
        resolver.resolve(&link).await,
        resolved(EntityType::Track, "T42")
    );
    aggregator.assert_async().await;
}

#[tokio::test]
async fn test_resolve_aggregator_failure_is_unresolved() {
    let mut server = Server::new_async().await;
    let link = format!("{}/music/unknown", server.url());

    let _music = server
        .mock("GET", "/music/unknown")
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;
    let _aggregator = server
        .mock("POST", "/aggregate")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    assert_eq!(resolver(&server.url()).resolve(&link).await, None);
}

#[tokio::test]
async fn test_resolve_aggregator_without_spotify_link() {
    let mut server = Server::new_async().await;
    let link = format!("{}/music/no-spotify", server.url());

    let _music = server
        .mock("GET", "/music/no-spotify")
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;
    let _aggregator = server
        .mock("POST", "/aggregate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": { "item": { "links": {} } } }).to_string())
        .create_async()
        .await;

    assert_eq!(resolver(&server.url()).resolve(&link).await, None);
}
