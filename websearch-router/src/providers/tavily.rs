//! Tavily: research search with a synthesised answer.

use serde::{Deserialize, Serialize};

use super::{base_url, decode, null_default};
use crate::config::TavilySettings;
use crate::credentials::Credential;
use crate::error::SearchError;
use crate::http::HttpClient;
use crate::provider::{SearchProvider, SearchRequest};
use crate::types::{round_to, Provider, SearchResponse, SearchResult};

pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Tavily search adapter.
#[derive(Debug, Clone)]
pub struct TavilyProvider {
    settings: TavilySettings,
}

impl TavilyProvider {
    pub fn new(settings: TavilySettings) -> Self {
        Self { settings }
    }
}

// Tavily takes the key in the body rather than a header.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    topic: &'a str,
    include_images: bool,
    include_answer: bool,
    include_raw_content: bool,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    include_domains: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    exclude_domains: &'a [String],
}

impl SearchProvider for TavilyProvider {
    async fn search(
        &self,
        client: &HttpClient,
        credential: &Credential,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        let query = request.require_query(Provider::Tavily)?;
        let overrides = &request.overrides;
        let body = TavilyRequest {
            api_key: credential.expose(),
            query,
            max_results: request.max_results,
            search_depth: overrides.depth.as_deref().unwrap_or(&self.settings.depth),
            topic: overrides.topic.as_deref().unwrap_or(&self.settings.topic),
            include_images: request.include_images,
            include_answer: true,
            include_raw_content: overrides.include_raw_content,
            include_domains: &request.include_domains,
            exclude_domains: &request.exclude_domains,
        };
        let base = base_url(self.settings.base_url.as_deref(), DEFAULT_BASE_URL);
        let text = client
            .post_json(Provider::Tavily, &format!("{base}/search"), &[], &body)
            .await?;
        parse_response(&text, query, request.max_results)
    }

    fn provider(&self) -> Provider {
        Provider::Tavily
    }
}

#[derive(Debug, Default, Deserialize)]
struct TavilyResponse {
    #[serde(default, deserialize_with = "null_default")]
    results: Vec<TavilyResult>,
    #[serde(default, deserialize_with = "null_default")]
    answer: String,
    #[serde(default, deserialize_with = "null_default")]
    images: Vec<TavilyImage>,
}

#[derive(Debug, Default, Deserialize)]
struct TavilyResult {
    #[serde(default, deserialize_with = "null_default")]
    title: String,
    #[serde(default, deserialize_with = "null_default")]
    url: String,
    #[serde(default, deserialize_with = "null_default")]
    content: String,
    #[serde(default, deserialize_with = "null_default")]
    score: f64,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    raw_content: Option<String>,
}

// Images arrive as plain URLs, or as objects when descriptions are enabled.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TavilyImage {
    Url(String),
    Described { url: String },
}

impl TavilyImage {
    fn into_url(self) -> String {
        match self {
            Self::Url(url) | Self::Described { url } => url,
        }
    }
}

/// Normalise a Tavily search response.
pub(crate) fn parse_response(
    body: &str,
    query: &str,
    max_results: usize,
) -> Result<SearchResponse, SearchError> {
    let data: TavilyResponse = decode(Provider::Tavily, body)?;

    let mut response = SearchResponse::new(Provider::Tavily, query);
    response.results = data
        .results
        .into_iter()
        .take(max_results)
        .map(|item| SearchResult {
            title: item.title,
            url: item.url,
            snippet: item.content,
            score: round_to(item.score, 3),
            date: item.published_date,
            provider: Provider::Tavily,
            raw_content: item.raw_content.filter(|text| !text.is_empty()),
        })
        .collect();
    response.answer = data.answer;
    response.images = data.images.into_iter().map(TavilyImage::into_url).collect();
    Ok(response)
}
