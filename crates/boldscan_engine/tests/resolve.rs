use std::time::Duration;

use boldscan_engine::{ResolverSettings, VideoResolver, YoutubeResolver, LookupFailure};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FALLBACK: &str = "fallback-id";

fn resolver_for(server: &MockServer) -> YoutubeResolver {
    YoutubeResolver::new(ResolverSettings {
        endpoint: format!("{}/youtube/v3/search", server.uri()),
        api_key: Some("test-key".to_string()),
        fallback_video_id: FALLBACK.to_string(),
        request_timeout: Duration::from_secs(2),
    })
    .expect("resolver builds")
}

#[tokio::test]
async fn resolves_first_item_with_expected_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("part", "snippet"))
        .and(query_param("q", "Quantum Computing"))
        .and(query_param("key", "test-key"))
        .and(query_param("maxResults", "1"))
        .and(query_param("type", "video"))
        .and(query_param("videoEmbeddable", "true"))
        .and(query_param("videoSyndicated", "true"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"items":[{"id":{"kind":"youtube#video","videoId":"qc123"}}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    assert_eq!(resolver.resolve(Some("  Quantum Computing ")).await, "qc123");
}

#[tokio::test]
async fn blank_input_returns_fallback_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    assert_eq!(resolver.resolve(None).await, FALLBACK);
    assert_eq!(resolver.resolve(Some("")).await, FALLBACK);
    assert_eq!(resolver.resolve(Some("   \t")).await, FALLBACK);
}

#[tokio::test]
async fn missing_credential_returns_fallback_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = YoutubeResolver::new(ResolverSettings {
        endpoint: format!("{}/youtube/v3/search", server.uri()),
        api_key: None,
        fallback_video_id: FALLBACK.to_string(),
        ..ResolverSettings::default()
    })
    .expect("resolver builds");
    assert_eq!(resolver.resolve(Some("Rust")).await, FALLBACK);
    assert_eq!(resolver.fallback_video_id(), FALLBACK);
}

#[tokio::test]
async fn empty_items_returns_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"items":[]}"#))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    assert_eq!(resolver.resolve(Some("Rust")).await, FALLBACK);
    assert_eq!(
        resolver.search("Rust", "test-key").await,
        Err(LookupFailure::NoItems)
    );
}

#[tokio::test]
async fn missing_video_id_returns_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"items":[{"id":{"kind":"youtube#channel","channelId":"c"}}]}"#),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    assert_eq!(resolver.resolve(Some("Rust")).await, FALLBACK);
    assert_eq!(
        resolver.search("Rust", "test-key").await,
        Err(LookupFailure::MissingVideoId)
    );
}

#[tokio::test]
async fn api_error_status_returns_fallback_and_keeps_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_string(r#"{"error":{"code":403,"message":"quota exceeded"}}"#),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    assert_eq!(resolver.resolve(Some("Rust")).await, FALLBACK);
    assert_eq!(
        resolver.search("Rust", "test-key").await,
        Err(LookupFailure::HttpStatus {
            status: 403,
            message: "quota exceeded".to_string()
        })
    );
}

#[tokio::test]
async fn malformed_body_returns_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    assert_eq!(resolver.resolve(Some("Rust")).await, FALLBACK);
    assert!(matches!(
        resolver.search("Rust", "test-key").await,
        Err(LookupFailure::InvalidBody(_))
    ));
}

#[tokio::test]
async fn slow_response_times_out_to_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_string(r#"{"items":[{"id":{"videoId":"late"}}]}"#),
        )
        .mount(&server)
        .await;

    let resolver = YoutubeResolver::new(ResolverSettings {
        endpoint: format!("{}/youtube/v3/search", server.uri()),
        api_key: Some("test-key".to_string()),
        fallback_video_id: FALLBACK.to_string(),
        request_timeout: Duration::from_millis(50),
    })
    .expect("resolver builds");
    assert_eq!(resolver.resolve(Some("Rust")).await, FALLBACK);
}

#[tokio::test]
async fn one_resolver_serves_many_lookups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"items":[{"id":{"videoId":"shared"}}]}"#,
        ))
        .expect(3)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    for phrase in ["First Topic", "Second Topic", "Third Topic"] {
        assert_eq!(resolver.resolve(Some(phrase)).await, "shared");
    }
}
