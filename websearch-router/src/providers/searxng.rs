//! SearXNG: self-hosted privacy-first meta-search.
//!
//! The credential is the instance URL. The instance must have `json`
//! enabled in `search.formats`.

use serde::Deserialize;
use url::Url;

use super::{decode, null_default};
use crate::config::SearxngSettings;
use crate::credentials::Credential;
use crate::error::SearchError;
use crate::http::HttpClient;
use crate::provider::{SearchProvider, SearchRequest, TimeRange};
use crate::types::{round_to, Provider, SearchResponse, SearchResult};

/// SearXNG search adapter.
#[derive(Debug, Clone)]
pub struct SearxngProvider {
    settings: SearxngSettings,
}

impl SearxngProvider {
    pub fn new(settings: SearxngSettings) -> Self {
        Self { settings }
    }

    fn endpoint(
        &self,
        instance: &str,
        query: &str,
        request: &SearchRequest,
    ) -> Result<Url, SearchError> {
        let base = instance.trim().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/search")).map_err(|e| {
            SearchError::Credential {
                provider: Provider::Searxng,
                message: format!("instance URL is malformed: {e}"),
            }
        })?;

        let overrides = &request.overrides;
        let language = overrides
            .language
            .as_deref()
            .unwrap_or(&self.settings.language);
        let engines = if overrides.engines.is_empty() {
            &self.settings.engines
        } else {
            &overrides.engines
        };

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("format", "json")
                .append_pair("language", language)
                .append_pair("safesearch", &self.settings.safesearch.to_string());
            if !overrides.categories.is_empty() {
                pairs.append_pair("categories", &overrides.categories.join(","));
            }
            if !engines.is_empty() {
                pairs.append_pair("engines", &engines.join(","));
            }
            if let Some(range) = request.time_range.and_then(time_range) {
                pairs.append_pair("time_range", range);
            }
        }
        Ok(url)
    }
}

// SearXNG has no hour window.
fn time_range(range: TimeRange) -> Option<&'static str> {
    match range {
        TimeRange::Hour => None,
        TimeRange::Day => Some("day"),
        TimeRange::Week => Some("week"),
        TimeRange::Month => Some("month"),
        TimeRange::Year => Some("year"),
    }
}

impl SearchProvider for SearxngProvider {
    async fn search(
        &self,
        client: &HttpClient,
        credential: &Credential,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        let query = request.require_query(Provider::Searxng)?;
        let url = self.endpoint(credential.expose(), query, request)?;
        let text = client.get(Provider::Searxng, url, &[]).await?;
        parse_response(&text, query, request.max_results)
    }

    fn provider(&self) -> Provider {
        Provider::Searxng
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearxngResponse {
    #[serde(default, deserialize_with = "null_default")]
    results: Vec<SearxngResult>,
    #[serde(default, deserialize_with = "null_default")]
    answers: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_default")]
    infoboxes: Vec<Infobox>,
    #[serde(default, deserialize_with = "null_default")]
    suggestions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearxngResult {
    #[serde(default, deserialize_with = "null_default")]
    title: String,
    #[serde(default, deserialize_with = "null_default")]
    url: String,
    #[serde(default, deserialize_with = "null_default")]
    content: String,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    published_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Infobox {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    infobox: Option<String>,
}

/// Normalise a SearXNG JSON response.
pub(crate) fn parse_response(
    body: &str,
    query: &str,
    max_results: usize,
) -> Result<SearchResponse, SearchError> {
    let data: SearxngResponse = decode(Provider::Searxng, body)?;

    let mut response = SearchResponse::new(Provider::Searxng, query);
    response.results = data
        .results
        .into_iter()
        .take(max_results)
        .enumerate()
        .map(|(i, item)| SearchResult {
            title: item.title,
            url: item.url,
            snippet: item.content,
            score: round_to(item.score.unwrap_or(1.0 - i as f64 * 0.05), 3),
            date: item.published_date,
            provider: Provider::Searxng,
            raw_content: None,
        })
        .collect();

    response.answer = if let Some(answer) = data.answers.first() {
        answer_text(answer)
    } else if let Some(infobox) = data.infoboxes.first() {
        infobox
            .content
            .clone()
            .filter(|c| !c.is_empty())
            .or_else(|| infobox.infobox.clone())
            .unwrap_or_default()
    } else {
        response
            .results
            .first()
            .map(|r| r.snippet.clone())
            .unwrap_or_default()
    };
    response.related = data.suggestions;
    Ok(response)
}

// Older instances send answers as strings, newer ones as objects.
fn answer_text(answer: &serde_json::Value) -> String {
    match answer {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => match map.get("answer") {
            Some(serde_json::Value::String(s)) => s.clone(),
            _ => answer.to_string(),
        },
        other => other.to_string(),
    }
}
