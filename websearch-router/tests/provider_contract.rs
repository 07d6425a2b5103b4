//! Provider contract tests.
//!
//! Each provider adapter talks to a wiremock server standing in for the
//! real API. These tests verify:
//! - request method, path, headers and body match the provider's API
//! - responses are normalised into `SearchResponse`
//! - HTTP error statuses map to friendly `SearchError::Provider` messages
//! - fallback continues over real HTTP failures

use serde_json::json;
use websearch_router::credentials;
use websearch_router::{
    search, ErrorKind, HttpBackend, Provider, ProviderBackend, RouterConfig, RoutingReason,
    SearchError, SearchRequest, SearchResponse, TimeRange,
};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERPER_KEY: &str = "serper-test-key-0123";
const TAVILY_KEY: &str = "tvly-test-key-01234";
const EXA_KEY: &str = "exa-test-key-012345";
const YOU_KEY: &str = "you-test-key-012345";

/// Config with every provider pointed at `server`.
fn mock_config(server: &MockServer) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.serper.api_key = Some(SERPER_KEY.into());
    config.serper.base_url = Some(server.uri());
    config.tavily.api_key = Some(TAVILY_KEY.into());
    config.tavily.base_url = Some(server.uri());
    config.exa.api_key = Some(EXA_KEY.into());
    config.exa.base_url = Some(server.uri());
    config.you.api_key = Some(YOU_KEY.into());
    config.you.base_url = Some(server.uri());
    config.searxng.instance_url = Some(server.uri());
    config.defaults.timeout_seconds = 5;
    config
}

async fn search_with(
    config: &RouterConfig,
    provider: Provider,
    request: &SearchRequest,
) -> Result<SearchResponse, SearchError> {
    let credential = credentials::resolve(config, provider)?;
    HttpBackend::new(config)
        .search(provider, &credential, request)
        .await
}

fn provider_error(err: SearchError) -> (u16, String) {
    match err {
        SearchError::Provider { status, message } => (status, message),
        other => panic!("expected provider error, got {other:?}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Serper
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn serper_request_format_and_normalisation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", SERPER_KEY))
        .and(body_partial_json(json!({
            "q": "pixel 9 price",
            "gl": "us",
            "hl": "en",
            "num": 2,
            "tbs": "qdr:w"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                {"title": "Pixel 9", "link": "https://store.google.com", "snippet": "From $799"},
                {"title": "Review", "link": "https://example.com/review", "snippet": "Great phone", "date": "Aug 20, 2024"},
                {"title": "Dropped", "link": "https://example.com/3", "snippet": "past max_results"}
            ],
            "answerBox": {"answer": "$799"},
            "relatedSearches": [{"query": "pixel 9 pro price"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let mut request = SearchRequest::new("pixel 9 price", 2);
    request.time_range = Some(TimeRange::Week);
    let response = search_with(&config, Provider::Serper, &request)
        .await
        .expect("serper search");

    assert_eq!(response.provider, Provider::Serper);
    assert_eq!(response.results.len(), 2);
    assert_eq!(response.results[0].url, "https://store.google.com");
    assert_eq!(response.results[1].date.as_deref(), Some("Aug 20, 2024"));
    assert!((response.results[1].score - 0.9).abs() < 1e-9);
    assert_eq!(response.answer, "$799");
    assert_eq!(response.related, vec!["pixel 9 pro price"]);
}

#[tokio::test]
async fn serper_type_override_selects_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let mut request = SearchRequest::new("rust release", 5);
    request.overrides.serper_type = Some("news".into());
    let response = search_with(&config, Provider::Serper, &request)
        .await
        .expect("serper news");
    assert!(response.results.is_empty());
    assert_eq!(response.answer, "");
}

#[tokio::test]
async fn serper_images_fetched_on_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [{"title": "t", "link": "https://a.example", "snippet": "s"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .and(body_partial_json(json!({"q": "aurora", "num": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [
                {"imageUrl": "https://img.example/1.jpg"},
                {"imageUrl": ""},
                {"imageUrl": "https://img.example/2.jpg"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let mut request = SearchRequest::new("aurora", 5);
    request.include_images = true;
    let response = search_with(&config, Provider::Serper, &request)
        .await
        .expect("serper search");
    assert_eq!(
        response.images,
        vec!["https://img.example/1.jpg", "https://img.example/2.jpg"]
    );
}

#[tokio::test]
async fn serper_image_failure_keeps_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [{"title": "t", "link": "https://a.example", "snippet": "s"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let mut request = SearchRequest::new("aurora", 5);
    request.include_images = true;
    let response = search_with(&config, Provider::Serper, &request)
        .await
        .expect("search succeeds without images");
    assert_eq!(response.results.len(), 1);
    assert!(response.images.is_empty());
}

// ────────────────────────────────────────────────────────────────────────────
// Tavily
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn tavily_sends_key_in_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({
            "api_key": TAVILY_KEY,
            "query": "how does raft consensus work",
            "max_results": 3,
            "search_depth": "advanced",
            "topic": "general",
            "include_answer": true,
            "include_domains": ["raft.github.io"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Raft elects a leader that replicates a log.",
            "results": [
                {"title": "Raft", "url": "https://raft.github.io", "content": "Understandable consensus", "score": 0.98765}
            ],
            "images": ["https://img.example/raft.png", {"url": "https://img.example/log.png", "description": "log"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let mut request = SearchRequest::new("how does raft consensus work", 3);
    request.overrides.depth = Some("advanced".into());
    request.include_domains = vec!["raft.github.io".into()];
    let response = search_with(&config, Provider::Tavily, &request)
        .await
        .expect("tavily search");

    assert_eq!(response.provider, Provider::Tavily);
    assert_eq!(response.answer, "Raft elects a leader that replicates a log.");
    assert!((response.results[0].score - 0.988).abs() < 1e-9);
    assert_eq!(
        response.images,
        vec!["https://img.example/raft.png", "https://img.example/log.png"]
    );
}

#[tokio::test]
async fn tavily_raw_content_on_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({
            "query": "raft paper",
            "include_raw_content": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"title": "Raft", "url": "https://raft.github.io/raft.pdf", "content": "In search of", "raw_content": "Raft is a consensus algorithm..."}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let mut request = SearchRequest::new("raft paper", 3);
    request.overrides.include_raw_content = true;
    let response = search_with(&config, Provider::Tavily, &request)
        .await
        .expect("tavily search");
    assert_eq!(
        response.results[0].raw_content.as_deref(),
        Some("Raft is a consensus algorithm...")
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Exa
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn exa_search_request_format() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", EXA_KEY))
        .and(body_partial_json(json!({
            "query": "startups building vector databases",
            "numResults": 4,
            "type": "neural",
            "category": "company",
            "contents": {"text": {"maxCharacters": 1000}, "highlights": true}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"title": "Qdrant", "url": "https://qdrant.tech", "text": "Vector search engine", "highlights": ["Open-source vector database"], "score": 0.21}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let mut request = SearchRequest::new("startups building vector databases", 4);
    request.overrides.category = Some("company".into());
    let response = search_with(&config, Provider::Exa, &request)
        .await
        .expect("exa search");
    assert_eq!(response.results[0].snippet, "Open-source vector database");
    assert_eq!(response.query, "startups building vector databases");
}

#[tokio::test]
async fn exa_similar_url_uses_find_similar() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/findSimilar"))
        .and(body_partial_json(json!({"url": "https://linear.app", "numResults": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"title": "Height", "url": "https://height.app", "text": "Project management"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let mut request = SearchRequest::new("", 5);
    request.similar_url = Some("https://linear.app".into());
    let outcome = search(&request, &config, None).await.expect("find similar");

    assert_eq!(outcome.response.provider, Provider::Exa);
    assert_eq!(outcome.response.query, "Similar to: https://linear.app");
    assert_eq!(outcome.routing.reason, RoutingReason::SimilarUrlSpecified);
    assert!(outcome.routing.auto_routed);
}

// ────────────────────────────────────────────────────────────────────────────
// You.com
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn you_request_uses_query_string() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(header("x-api-key", YOU_KEY))
        .and(query_param("query", "latest rust news"))
        .and(query_param("count", "2"))
        .and(query_param("country", "DE"))
        .and(query_param("language", "EN"))
        .and(query_param("freshness", "day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": {"web": [
                {"title": "Rust 1.90", "url": "https://blog.rust-lang.org", "snippets": ["Rust 1.90 released"]},
                {"title": "This Week in Rust", "url": "https://this-week-in-rust.org", "description": "Weekly digest"}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let mut request = SearchRequest::new("latest rust news", 2);
    request.time_range = Some(TimeRange::Hour);
    request.overrides.country = Some("de".into());
    let response = search_with(&config, Provider::You, &request)
        .await
        .expect("you search");
    assert_eq!(response.results.len(), 2);
    assert_eq!(response.answer, "Rust 1.90 released Weekly digest");
}

#[tokio::test]
async fn you_livecrawl_and_news_toggle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("livecrawl", "web"))
        .and(query_param("livecrawl_formats", "markdown"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": {
                "web": [{"title": "Tokio", "url": "https://tokio.rs", "snippets": ["Async runtime"], "contents": {"markdown": "# Tokio"}}],
                "news": [{"title": "Tokio 2.0", "url": "https://news.example/tokio", "description": "Released"}]
            }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let mut request = SearchRequest::new("tokio runtime", 3);
    request.overrides.livecrawl = Some("web".into());
    let response = search_with(&config, Provider::You, &request)
        .await
        .expect("you search");
    assert_eq!(response.results[0].raw_content.as_deref(), Some("# Tokio"));
    assert_eq!(response.news.len(), 1);
    assert_eq!(response.news[0].snippet, "Released");

    request.overrides.include_news = Some(false);
    let response = search_with(&config, Provider::You, &request)
        .await
        .expect("you search");
    assert!(response.news.is_empty());
    assert_eq!(response.results.len(), 1);
}

// ────────────────────────────────────────────────────────────────────────────
// SearXNG
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn searxng_queries_instance_for_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "privacy respecting email"))
        .and(query_param("format", "json"))
        .and(query_param("safesearch", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"title": "Proton Mail", "url": "https://proton.me", "content": "Encrypted email", "score": 3.2}
            ],
            "infoboxes": [{"infobox": "Proton Mail", "content": "Swiss email service"}],
            "suggestions": ["tutanota"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let request = SearchRequest::new("privacy respecting email", 5);
    let response = search_with(&config, Provider::Searxng, &request)
        .await
        .expect("searxng search");
    assert_eq!(response.provider, Provider::Searxng);
    assert_eq!(response.answer, "Swiss email service");
    assert_eq!(response.related, vec!["tutanota"]);
}

#[tokio::test]
async fn searxng_forbidden_means_json_disabled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let err = search_with(&config, Provider::Searxng, &SearchRequest::new("q", 5))
        .await
        .unwrap_err();
    let (status, message) = provider_error(err);
    assert_eq!(status, 403);
    assert!(message.contains("JSON API disabled"));
}

// ────────────────────────────────────────────────────────────────────────────
// Error mapping
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unauthorized_maps_to_invalid_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let err = search_with(&config, Provider::Exa, &SearchRequest::new("q", 5))
        .await
        .unwrap_err();
    let (status, message) = provider_error(err);
    assert_eq!(status, 401);
    assert!(message.contains("Invalid or expired API key"));
    assert!(!message.contains(EXA_KEY));
}

#[tokio::test]
async fn rate_limit_maps_to_friendly_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let err = search_with(&config, Provider::Serper, &SearchRequest::new("q", 5))
        .await
        .unwrap_err();
    let (status, message) = provider_error(err);
    assert_eq!(status, 429);
    assert!(message.contains("Rate limit exceeded"));
}

#[tokio::test]
async fn unknown_status_carries_error_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"error": "query too long"})),
        )
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let err = search_with(&config, Provider::Tavily, &SearchRequest::new("q", 5))
        .await
        .unwrap_err();
    let (status, message) = provider_error(err);
    assert_eq!(status, 422);
    assert_eq!(message, "API error: query too long");
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let config = mock_config(&server);
    let err = search_with(&config, Provider::Serper, &SearchRequest::new("q", 5))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"organic": []}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = mock_config(&server);
    config.defaults.timeout_seconds = 1;
    let err = search_with(&config, Provider::Serper, &SearchRequest::new("q", 5))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("timed out after 1s"));
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback over HTTP
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_winner_falls_back_to_next_provider() {
    let serper = MockServer::start().await;
    let tavily = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&serper)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Fallback answer",
            "results": [{"title": "t", "url": "https://t.example", "content": "c", "score": 0.5}]
        })))
        .expect(1)
        .mount(&tavily)
        .await;

    let mut config = RouterConfig::default();
    config.serper.api_key = Some(SERPER_KEY.into());
    config.serper.base_url = Some(serper.uri());
    config.tavily.api_key = Some(TAVILY_KEY.into());
    config.tavily.base_url = Some(tavily.uri());

    let outcome = search(&SearchRequest::new("iPhone 16 Pro Max price", 5), &config, None)
        .await
        .expect("fallback succeeds");

    assert_eq!(outcome.response.provider, Provider::Tavily);
    assert_eq!(outcome.response.answer, "Fallback answer");
    assert!(outcome.routing.fallback_used);
    assert_eq!(outcome.routing.original_provider, Some(Provider::Serper));
    assert_eq!(outcome.routing.fallback_errors.len(), 1);
    assert_eq!(outcome.routing.fallback_errors[0].provider, Provider::Serper);
    assert_eq!(outcome.routing.fallback_errors[0].kind, ErrorKind::Provider);

    let json = serde_json::to_value(&outcome).expect("serialize");
    assert_eq!(json["provider"], "tavily");
    assert_eq!(json["routing"]["original_provider"], "serper");
}

#[tokio::test]
async fn every_failure_exhausts_with_all_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = RouterConfig::default();
    config.serper.api_key = Some(SERPER_KEY.into());
    config.serper.base_url = Some(server.uri());
    config.exa.api_key = Some(EXA_KEY.into());
    config.exa.base_url = Some(server.uri());

    let err = search(&SearchRequest::new("weather in oslo", 5), &config, Some(Provider::Exa))
        .await
        .unwrap_err();
    let SearchError::Exhausted(failure) = err else {
        panic!("expected exhaustion");
    };
    let tried: Vec<_> = failure.errors.iter().map(|e| e.provider).collect();
    assert_eq!(tried, vec![Provider::Exa, Provider::Serper]);
    assert!(failure
        .errors
        .iter()
        .all(|e| e.message.contains("Server error")));
    assert_eq!(failure.decision.reason, RoutingReason::ExplicitProvider);
}
