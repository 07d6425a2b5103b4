//! Provider adapter traits and the per-search request.
//!
//! Each search API implements [`SearchProvider`]. The executor reaches
//! providers through a [`ProviderBackend`], which lets tests swap the
//! network for canned responses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::RouterConfig;
use crate::credentials::Credential;
use crate::error::SearchError;
use crate::http::HttpClient;
use crate::providers::{ExaProvider, SearxngProvider, SerperProvider, TavilyProvider, YouProvider};
use crate::types::{Provider, SearchResponse};

/// Restrict results to a recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(format!(
                "unknown time range: {other} (expected hour, day, week, month or year)"
            )),
        }
    }
}

/// Per-search overrides of provider settings. `None` keeps the configured
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderOverrides {
    /// Serper/You.com country code.
    pub country: Option<String>,
    /// Serper/You.com/SearXNG language code.
    pub language: Option<String>,
    /// Serper search vertical.
    pub serper_type: Option<String>,
    /// Tavily search depth.
    pub depth: Option<String>,
    /// Tavily topic.
    pub topic: Option<String>,
    /// Ask Tavily for each page's full text.
    pub include_raw_content: bool,
    /// Exa search type.
    pub exa_type: Option<String>,
    /// Exa content category, e.g. `company` or `research paper`.
    pub category: Option<String>,
    /// Exa earliest publication date.
    pub start_date: Option<String>,
    /// Exa latest publication date.
    pub end_date: Option<String>,
    /// You.com freshness; takes precedence over the time range.
    pub freshness: Option<String>,
    /// You.com live crawl scope: `web`, `news` or `all`.
    pub livecrawl: Option<String>,
    /// Keep You.com news hits; `None` keeps them.
    pub include_news: Option<bool>,
    /// SearXNG categories.
    pub categories: Vec<String>,
    /// SearXNG engines; empty keeps the configured list.
    pub engines: Vec<String>,
}

/// One search to run against whichever provider the executor picks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// Query text. May be empty for an Exa similar-URL search.
    pub query: String,
    pub max_results: usize,
    pub time_range: Option<TimeRange>,
    /// Also fetch image URLs where the provider supports it.
    pub include_images: bool,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
    /// Find pages similar to this URL (Exa only).
    pub similar_url: Option<String>,
    pub overrides: ProviderOverrides,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            max_results,
            ..Default::default()
        }
    }

    /// The query text, or a config error for providers that need one.
    pub(crate) fn require_query(&self, provider: Provider) -> Result<&str, SearchError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(SearchError::Config(format!("{provider} requires a query")));
        }
        Ok(query)
    }
}

/// A search API adapter.
///
/// Implementors build the provider's request, send it through the given
/// client and normalise the JSON response into a [`SearchResponse`].
pub trait SearchProvider: Send + Sync {
    /// Run `request` with `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on transport failure, a non-2xx status or an
    /// undecodable body.
    fn search(
        &self,
        client: &HttpClient,
        credential: &Credential,
        request: &SearchRequest,
    ) -> impl std::future::Future<Output = Result<SearchResponse, SearchError>> + Send;

    /// Which provider this adapter talks to.
    fn provider(&self) -> Provider;
}

/// Dispatches a search to a provider by identifier.
pub trait ProviderBackend: Send + Sync {
    /// Run `request` against `provider`. The credential has already been
    /// validated.
    fn search(
        &self,
        provider: Provider,
        credential: &Credential,
        request: &SearchRequest,
    ) -> impl std::future::Future<Output = Result<SearchResponse, SearchError>> + Send;
}

/// Backend calling the real provider APIs over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpBackend<'a> {
    config: &'a RouterConfig,
}

impl<'a> HttpBackend<'a> {
    pub fn new(config: &'a RouterConfig) -> Self {
        Self { config }
    }
}

impl ProviderBackend for HttpBackend<'_> {
    async fn search(
        &self,
        provider: Provider,
        credential: &Credential,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        // One client per attempt keeps each connection scoped to its exchange.
        let client = HttpClient::new(self.config.defaults.timeout_seconds)?;
        let config = self.config;
        match provider {
            Provider::Serper => {
                SerperProvider::new(config.serper.clone())
                    .search(&client, credential, request)
                    .await
            }
            Provider::Tavily => {
                TavilyProvider::new(config.tavily.clone())
                    .search(&client, credential, request)
                    .await
            }
            Provider::Exa => {
                ExaProvider::new(config.exa.clone())
                    .search(&client, credential, request)
                    .await
            }
            Provider::You => {
                YouProvider::new(config.you.clone())
                    .search(&client, credential, request)
                    .await
            }
            Provider::Searxng => {
                SearxngProvider::new(config.searxng.clone())
                    .search(&client, credential, request)
                    .await
            }
        }
    }
}
