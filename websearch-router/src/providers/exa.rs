//! Exa: neural search and find-similar.

use serde::{Deserialize, Serialize};

use super::{base_url, decode, null_default};
use crate::config::ExaSettings;
use crate::credentials::Credential;
use crate::error::SearchError;
use crate::http::HttpClient;
use crate::provider::{SearchProvider, SearchRequest};
use crate::types::{round_to, Provider, SearchResponse, SearchResult};

pub const DEFAULT_BASE_URL: &str = "https://api.exa.ai";

/// Characters of page text requested per result.
const TEXT_CHARS: usize = 1000;

/// Snippet length when a result has no highlight.
const SNIPPET_CHARS: usize = 500;

/// Exa search adapter.
#[derive(Debug, Clone)]
pub struct ExaProvider {
    settings: ExaSettings,
}

impl ExaProvider {
    pub fn new(settings: ExaSettings) -> Self {
        Self { settings }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    num_results: usize,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    search_type: Option<&'a str>,
    contents: Contents,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_published_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_published_date: Option<&'a str>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    include_domains: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    exclude_domains: &'a [String],
}

#[derive(Debug, Serialize)]
struct Contents {
    text: TextOptions,
    highlights: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextOptions {
    max_characters: usize,
}

impl SearchProvider for ExaProvider {
    async fn search(
        &self,
        client: &HttpClient,
        credential: &Credential,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        let overrides = &request.overrides;
        let similar_url = request
            .similar_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let query = match similar_url {
            Some(_) => None,
            None => Some(request.require_query(Provider::Exa)?),
        };

        let body = ExaRequest {
            query,
            url: similar_url,
            num_results: request.max_results,
            search_type: query.map(|_| {
                overrides
                    .exa_type
                    .as_deref()
                    .unwrap_or(&self.settings.search_type)
            }),
            contents: Contents {
                text: TextOptions {
                    max_characters: TEXT_CHARS,
                },
                highlights: true,
            },
            category: overrides.category.as_deref(),
            start_published_date: overrides.start_date.as_deref(),
            end_published_date: overrides.end_date.as_deref(),
            include_domains: &request.include_domains,
            exclude_domains: &request.exclude_domains,
        };

        let base = base_url(self.settings.base_url.as_deref(), DEFAULT_BASE_URL);
        let endpoint = if similar_url.is_some() {
            "findSimilar"
        } else {
            "search"
        };
        let headers = [("x-api-key", credential.expose())];
        let text = client
            .post_json(Provider::Exa, &format!("{base}/{endpoint}"), &headers, &body)
            .await?;

        let label = match similar_url {
            Some(url) => format!("Similar to: {url}"),
            None => request.query.trim().to_string(),
        };
        parse_response(&text, &label, request.max_results)
    }

    fn provider(&self) -> Provider {
        Provider::Exa
    }
}

#[derive(Debug, Default, Deserialize)]
struct ExaResponse {
    #[serde(default, deserialize_with = "null_default")]
    results: Vec<ExaResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaResult {
    #[serde(default, deserialize_with = "null_default")]
    title: String,
    #[serde(default, deserialize_with = "null_default")]
    url: String,
    #[serde(default, deserialize_with = "null_default")]
    text: String,
    #[serde(default, deserialize_with = "null_default")]
    highlights: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    score: f64,
    #[serde(default)]
    published_date: Option<String>,
}

/// Normalise an Exa search or find-similar response.
pub(crate) fn parse_response(
    body: &str,
    query: &str,
    max_results: usize,
) -> Result<SearchResponse, SearchError> {
    let data: ExaResponse = decode(Provider::Exa, body)?;

    let mut response = SearchResponse::new(Provider::Exa, query);
    response.results = data
        .results
        .into_iter()
        .take(max_results)
        .map(|item| {
            let snippet = match item.highlights.into_iter().next() {
                Some(highlight) => highlight,
                None => item.text.chars().take(SNIPPET_CHARS).collect(),
            };
            SearchResult {
                title: item.title,
                url: item.url,
                snippet,
                score: round_to(item.score, 3),
                date: item.published_date,
                provider: Provider::Exa,
                raw_content: None,
            }
        })
        .collect();
    response.answer = response
        .results
        .first()
        .map(|r| r.snippet.clone())
        .unwrap_or_default();
    Ok(response)
}
