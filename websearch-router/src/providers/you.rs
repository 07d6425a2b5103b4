//! You.com: LLM-ready web snippets.

use serde::Deserialize;
use url::Url;

use super::{base_url, decode, null_default, rank_score};
use crate::config::YouSettings;
use crate::credentials::Credential;
use crate::error::SearchError;
use crate::http::HttpClient;
use crate::provider::{SearchProvider, SearchRequest, TimeRange};
use crate::types::{Provider, SearchResponse, SearchResult};

pub const DEFAULT_BASE_URL: &str = "https://ydc-index.io";

/// Snippets combined into the answer.
const ANSWER_SNIPPETS: usize = 3;

/// Longest answer, in characters.
const MAX_ANSWER_CHARS: usize = 1000;

/// News hits kept alongside the web results.
const MAX_NEWS: usize = 5;

/// You.com search adapter.
#[derive(Debug, Clone)]
pub struct YouProvider {
    settings: YouSettings,
}

impl YouProvider {
    pub fn new(settings: YouSettings) -> Self {
        Self { settings }
    }

    fn endpoint(&self, query: &str, request: &SearchRequest) -> Result<Url, SearchError> {
        let base = base_url(self.settings.base_url.as_deref(), DEFAULT_BASE_URL);
        let mut url = Url::parse(&format!("{base}/v1/search"))
            .map_err(|e| SearchError::Config(format!("invalid you base_url: {e}")))?;

        let overrides = &request.overrides;
        let country = overrides.country.as_deref().unwrap_or(&self.settings.country);
        let language = overrides
            .language
            .as_deref()
            .unwrap_or(&self.settings.language);
        let freshness = overrides
            .freshness
            .clone()
            .or_else(|| request.time_range.map(|r| freshness_for(r).to_string()));

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("query", query)
                .append_pair("count", &request.max_results.to_string())
                .append_pair("safesearch", &self.settings.safesearch);
            if !country.is_empty() {
                pairs.append_pair("country", &country.to_uppercase());
            }
            if !language.is_empty() {
                pairs.append_pair("language", &language.to_uppercase());
            }
            if let Some(freshness) = &freshness {
                pairs.append_pair("freshness", freshness);
            }
            if let Some(scope) = &overrides.livecrawl {
                pairs
                    .append_pair("livecrawl", scope)
                    .append_pair("livecrawl_formats", "markdown");
            }
        }
        Ok(url)
    }
}

// You.com has no hour window; the closest is a day.
fn freshness_for(range: TimeRange) -> &'static str {
    match range {
        TimeRange::Hour | TimeRange::Day => "day",
        TimeRange::Week => "week",
        TimeRange::Month => "month",
        TimeRange::Year => "year",
    }
}

impl SearchProvider for YouProvider {
    async fn search(
        &self,
        client: &HttpClient,
        credential: &Credential,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        let query = request.require_query(Provider::You)?;
        let url = self.endpoint(query, request)?;
        let text = client
            .get(Provider::You, url, &[("x-api-key", credential.expose())])
            .await?;
        let mut response = parse_response(&text, query, request.max_results)?;
        if !request.overrides.include_news.unwrap_or(true) {
            response.news.clear();
        }
        Ok(response)
    }

    fn provider(&self) -> Provider {
        Provider::You
    }
}

#[derive(Debug, Default, Deserialize)]
struct YouResponse {
    #[serde(default, deserialize_with = "null_default")]
    results: YouResults,
}

#[derive(Debug, Default, Deserialize)]
struct YouResults {
    #[serde(default, deserialize_with = "null_default")]
    web: Vec<WebResult>,
    #[serde(default, deserialize_with = "null_default")]
    news: Vec<NewsResult>,
}

#[derive(Debug, Default, Deserialize)]
struct WebResult {
    #[serde(default, deserialize_with = "null_default")]
    title: String,
    #[serde(default, deserialize_with = "null_default")]
    url: String,
    #[serde(default, deserialize_with = "null_default")]
    description: String,
    #[serde(default, deserialize_with = "null_default")]
    snippets: Vec<String>,
    #[serde(default)]
    page_age: Option<String>,
    #[serde(default)]
    contents: Option<Contents>,
}

// Present only for live-crawled pages.
#[derive(Debug, Default, Deserialize)]
struct Contents {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    html: Option<String>,
}

impl Contents {
    fn into_text(self) -> Option<String> {
        self.markdown
            .filter(|text| !text.is_empty())
            .or(self.html)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
struct NewsResult {
    #[serde(default, deserialize_with = "null_default")]
    title: String,
    #[serde(default, deserialize_with = "null_default")]
    url: String,
    #[serde(default, deserialize_with = "null_default")]
    description: String,
    #[serde(default)]
    page_age: Option<String>,
}

/// Normalise a You.com search response.
pub(crate) fn parse_response(
    body: &str,
    query: &str,
    max_results: usize,
) -> Result<SearchResponse, SearchError> {
    let data: YouResponse = decode(Provider::You, body)?;

    let mut response = SearchResponse::new(Provider::You, query);
    response.results = data
        .results
        .web
        .into_iter()
        .take(max_results)
        .enumerate()
        .map(|(i, item)| SearchResult {
            title: item.title,
            url: item.url,
            snippet: item
                .snippets
                .into_iter()
                .next()
                .unwrap_or(item.description),
            score: rank_score(i, 0.05),
            date: item.page_age,
            provider: Provider::You,
            raw_content: item.contents.and_then(Contents::into_text),
        })
        .collect();
    response.news = data
        .results
        .news
        .into_iter()
        .take(MAX_NEWS)
        .enumerate()
        .map(|(i, item)| SearchResult {
            title: item.title,
            url: item.url,
            snippet: item.description,
            score: rank_score(i, 0.05),
            date: item.page_age,
            provider: Provider::You,
            raw_content: None,
        })
        .collect();

    let joined = response
        .results
        .iter()
        .take(ANSWER_SNIPPETS)
        .map(|r| r.snippet.as_str())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    response.answer = joined.chars().take(MAX_ANSWER_CHARS).collect();
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_results_ranked_and_answer_joined() {
        let body = r#"{"results": {"web": [
            {"title": "A", "url": "https://a.example", "snippets": ["alpha one", "alpha two"], "page_age": "2025-01-02T00:00:00"},
            {"title": "B", "url": "https://b.example", "description": "beta"},
            {"title": "C", "url": "https://c.example", "snippets": []},
            {"title": "D", "url": "https://d.example", "snippets": ["delta"]}
        ], "news": []}}"#;
        let response = parse_response(body, "q", 10).expect("parse");
        assert_eq!(response.results.len(), 4);
        assert_eq!(response.results[0].snippet, "alpha one");
        assert_eq!(response.results[1].snippet, "beta");
        assert!((response.results[1].score - 0.95).abs() < 1e-9);
        assert_eq!(response.results[0].date.as_deref(), Some("2025-01-02T00:00:00"));
        assert_eq!(response.answer, "alpha one beta");
    }

    #[test]
    fn answer_capped_at_limit() {
        let long = "x".repeat(900);
        let body = format!(
            r#"{{"results": {{"web": [{{"snippets": ["{long}"]}}, {{"snippets": ["{long}"]}}]}}}}"#
        );
        let response = parse_response(&body, "q", 5).expect("parse");
        assert_eq!(response.answer.chars().count(), MAX_ANSWER_CHARS);
    }

    #[test]
    fn endpoint_upper_cases_locale() {
        let provider = YouProvider::new(YouSettings::default());
        let mut request = SearchRequest::new("rust async", 4);
        request.time_range = Some(TimeRange::Hour);
        let url = provider.endpoint("rust async", &request).expect("url");
        assert_eq!(url.path(), "/v1/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("query".into(), "rust async".into())));
        assert!(pairs.contains(&("count".into(), "4".into())));
        assert!(pairs.contains(&("country".into(), "US".into())));
        assert!(pairs.contains(&("language".into(), "EN".into())));
        assert!(pairs.contains(&("freshness".into(), "day".into())));
        assert!(pairs.contains(&("safesearch".into(), "moderate".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "livecrawl"));
    }

    #[test]
    fn livecrawl_requests_markdown() {
        let provider = YouProvider::new(YouSettings::default());
        let mut request = SearchRequest::new("q", 4);
        request.overrides.livecrawl = Some("all".into());
        let url = provider.endpoint("q", &request).expect("url");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("livecrawl".into(), "all".into())));
        assert!(pairs.contains(&("livecrawl_formats".into(), "markdown".into())));
    }

    #[test]
    fn crawled_contents_and_news_are_kept() {
        let news: Vec<String> = (0..7)
            .map(|i| format!(r#"{{"title": "N{i}", "url": "https://n{i}.example", "description": "story {i}"}}"#))
            .collect();
        let body = format!(
            r##"{{"results": {{"web": [
                {{"title": "A", "url": "https://a.example", "snippets": ["a"], "contents": {{"markdown": "# A"}}}},
                {{"title": "B", "url": "https://b.example", "snippets": ["b"], "contents": {{"markdown": "", "html": "<p>B</p>"}}}},
                {{"title": "C", "url": "https://c.example", "snippets": ["c"]}}
            ], "news": [{}]}}}}"##,
            news.join(",")
        );
        let response = parse_response(&body, "q", 10).expect("parse");
        assert_eq!(response.results[0].raw_content.as_deref(), Some("# A"));
        assert_eq!(response.results[1].raw_content.as_deref(), Some("<p>B</p>"));
        assert_eq!(response.results[2].raw_content, None);
        assert_eq!(response.news.len(), MAX_NEWS);
        assert_eq!(response.news[0].snippet, "story 0");
        assert_eq!(response.news[4].title, "N4");
    }

    #[test]
    fn explicit_freshness_wins() {
        let provider = YouProvider::new(YouSettings::default());
        let mut request = SearchRequest::new("q", 4);
        request.time_range = Some(TimeRange::Year);
        request.overrides.freshness = Some("week".into());
        let url = provider.endpoint("q", &request).expect("url");
        assert!(url
            .query_pairs()
            .any(|(k, v)| k == "freshness" && v == "week"));
    }
}
