//! # websearch-router
//!
//! Query-intent routing across web search APIs with sequential fallback.
//!
//! A free-text query is scored against weighted signal catalogs (shopping,
//! research, discovery, local/news, RAG, privacy), the best-fit provider is
//! picked with a confidence estimate, and the search runs through a
//! fallback chain until one provider succeeds.
//!
//! ## Design
//!
//! - Signal tables are compiled once and shared read-only
//! - Routing is a pure function of the query and the configuration
//! - Providers are tried one at a time, each at most once
//! - Provider JSON is normalised at the adapter boundary into [`SearchResponse`]
//! - Per-provider failures are absorbed; only exhaustion reaches the caller
//!
//! ## Security
//!
//! - API keys never appear in logs, error messages or debug output
//! - Query text is logged only at trace level
//! - No network listeners; this is a library

pub mod analyzer;
pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod explain;
pub mod http;
pub mod provider;
pub mod providers;
pub mod router;
pub mod signals;
pub mod types;

pub use analyzer::{analyze, QueryAnalysis};
pub use config::RouterConfig;
pub use error::{AggregateFailure, AttemptError, ErrorKind, Result, SearchError};
pub use executor::{FallbackExecutor, RoutingMetadata, SearchOutcome};
pub use explain::{explain, RoutingExplanation};
pub use provider::{HttpBackend, ProviderBackend, SearchProvider, SearchRequest, TimeRange};
pub use router::{route, ConfidenceLevel, RoutingDecision, RoutingReason};
pub use signals::IntentCategory;
pub use types::{Provider, SearchResponse, SearchResult};

/// Choose how `request` will be routed.
///
/// - a pinned `provider` wins
/// - a similar-URL request without query text goes to Exa
/// - with auto-routing disabled, the configured default provider is used
/// - otherwise the query is analyzed and routed
pub fn decide(
    request: &SearchRequest,
    config: &RouterConfig,
    provider: Option<Provider>,
) -> RoutingDecision {
    match provider {
        Some(p) => RoutingDecision::explicit(p),
        None if has_similar_url(request) && request.query.trim().is_empty() => {
            RoutingDecision::similar_url()
        }
        None if !config.auto_routing.enabled => {
            RoutingDecision::explicit(config.defaults.provider)
        }
        None => route(&request.query, config),
    }
}

fn has_similar_url(request: &SearchRequest) -> bool {
    request
        .similar_url
        .as_deref()
        .is_some_and(|u| !u.trim().is_empty())
}

/// Route and execute a search against the real provider APIs.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the configuration is invalid or the
/// request has neither query text nor a similar URL, and
/// [`SearchError::Exhausted`] if every provider in the fallback chain failed.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> websearch_router::Result<()> {
/// let config = websearch_router::RouterConfig::default()
///     .merge_env_credentials(|var| std::env::var(var).ok());
/// let request = websearch_router::SearchRequest::new("how does TLS work", 5);
/// let outcome = websearch_router::search(&request, &config, None).await?;
/// for result in &outcome.response.results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    request: &SearchRequest,
    config: &RouterConfig,
    provider: Option<Provider>,
) -> Result<SearchOutcome> {
    config.validate()?;
    if request.max_results == 0 {
        return Err(SearchError::Config(
            "max_results must be greater than 0".into(),
        ));
    }
    if request.query.trim().is_empty() && !has_similar_url(request) {
        return Err(SearchError::Config(
            "a query is required unless a similar URL is given".into(),
        ));
    }

    let decision = decide(request, config, provider);
    FallbackExecutor::new(config, HttpBackend::new(config))
        .execute(decision, request)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_validates_config_zero_timeout() {
        let mut config = RouterConfig::default();
        config.defaults.timeout_seconds = 0;
        let result = search(&SearchRequest::new("test", 5), &config, None).await;
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn search_rejects_zero_max_results() {
        let result = search(&SearchRequest::new("test", 0), &RouterConfig::default(), None).await;
        assert!(result.unwrap_err().to_string().contains("max_results"));
    }

    #[tokio::test]
    async fn search_requires_query_or_similar_url() {
        let result = search(&SearchRequest::new("  ", 5), &RouterConfig::default(), None).await;
        assert!(result.unwrap_err().to_string().contains("query is required"));
    }

    #[test]
    fn pinned_provider_wins() {
        let decision = decide(
            &SearchRequest::new("weather", 5),
            &RouterConfig::default(),
            Some(Provider::Searxng),
        );
        assert_eq!(decision.provider, Provider::Searxng);
        assert_eq!(decision.reason, RoutingReason::ExplicitProvider);
    }

    #[test]
    fn similar_url_without_query_goes_to_exa() {
        let mut request = SearchRequest::new("", 5);
        request.similar_url = Some("https://notion.so".into());
        let decision = decide(&request, &RouterConfig::default(), None);
        assert_eq!(decision.provider, Provider::Exa);
        assert_eq!(decision.reason, RoutingReason::SimilarUrlSpecified);
    }

    #[test]
    fn disabled_auto_routing_uses_default_provider() {
        let mut config = RouterConfig::default();
        config.auto_routing.enabled = false;
        config.defaults.provider = Provider::Tavily;
        let decision = decide(&SearchRequest::new("weather", 5), &config, None);
        assert_eq!(decision.provider, Provider::Tavily);
        assert!(!decision.is_auto_routed());
    }

    #[test]
    fn auto_routing_analyzes_query() {
        let mut config = RouterConfig::default();
        config.serper.api_key = Some("serper-key-0123".into());
        let decision = decide(&SearchRequest::new("weather in oslo", 5), &config, None);
        assert_eq!(decision.provider, Provider::Serper);
        // 4.0 with no runner-up: 0.6 * 4/15 + 0.4
        assert_eq!(decision.reason, RoutingReason::ModerateConfidenceMatch);
    }
}
