//! Serper: Google results over a JSON API.
//!
//! Strong on shopping, local and news queries. Results are ranked by
//! position since Serper reports no relevance score.

use serde::{Deserialize, Serialize};

use super::{base_url, decode, null_default, rank_score};
use crate::config::SerperSettings;
use crate::credentials::Credential;
use crate::error::SearchError;
use crate::http::HttpClient;
use crate::provider::{SearchProvider, SearchRequest, TimeRange};
use crate::types::{Provider, SearchResponse, SearchResult};

pub const DEFAULT_BASE_URL: &str = "https://google.serper.dev";

/// Images fetched when images are requested.
const IMAGE_COUNT: usize = 5;

/// Serper search adapter.
#[derive(Debug, Clone)]
pub struct SerperProvider {
    settings: SerperSettings,
}

impl SerperProvider {
    pub fn new(settings: SerperSettings) -> Self {
        Self { settings }
    }
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    gl: &'a str,
    hl: &'a str,
    num: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    autocorrect: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tbs: Option<&'static str>,
}

fn tbs(range: TimeRange) -> &'static str {
    match range {
        TimeRange::Hour => "qdr:h",
        TimeRange::Day => "qdr:d",
        TimeRange::Week => "qdr:w",
        TimeRange::Month => "qdr:m",
        TimeRange::Year => "qdr:y",
    }
}

impl SearchProvider for SerperProvider {
    async fn search(
        &self,
        client: &HttpClient,
        credential: &Credential,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        let query = request.require_query(Provider::Serper)?;
        let overrides = &request.overrides;
        let country = overrides.country.as_deref().unwrap_or(&self.settings.country);
        let language = overrides
            .language
            .as_deref()
            .unwrap_or(&self.settings.language);
        let search_type = overrides
            .serper_type
            .as_deref()
            .unwrap_or(&self.settings.search_type);

        let base = base_url(self.settings.base_url.as_deref(), DEFAULT_BASE_URL);
        let headers = [("x-api-key", credential.expose())];
        let body = SerperRequest {
            q: query,
            gl: country,
            hl: language,
            num: request.max_results,
            autocorrect: Some(true),
            tbs: request.time_range.map(tbs),
        };
        let text = client
            .post_json(Provider::Serper, &format!("{base}/{search_type}"), &headers, &body)
            .await?;
        let mut response = parse_response(&text, query, request.max_results)?;

        if request.include_images {
            let body = SerperRequest {
                q: query,
                gl: country,
                hl: language,
                num: IMAGE_COUNT,
                autocorrect: None,
                tbs: None,
            };
            // Images are a bonus; the search itself already succeeded.
            match client
                .post_json(Provider::Serper, &format!("{base}/images"), &headers, &body)
                .await
                .and_then(|text| parse_images(&text))
            {
                Ok(images) => response.images = images,
                Err(e) => tracing::debug!(error = %e, "serper image search failed"),
            }
        }
        Ok(response)
    }

    fn provider(&self) -> Provider {
        Provider::Serper
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerperResponse {
    #[serde(default, deserialize_with = "null_default")]
    organic: Vec<Organic>,
    #[serde(default)]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    knowledge_graph: Option<KnowledgeGraph>,
    #[serde(default, deserialize_with = "null_default")]
    related_searches: Vec<RelatedSearch>,
}

#[derive(Debug, Default, Deserialize)]
struct Organic {
    #[serde(default, deserialize_with = "null_default")]
    title: String,
    #[serde(default, deserialize_with = "null_default")]
    link: String,
    #[serde(default, deserialize_with = "null_default")]
    snippet: String,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AnswerBox {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct KnowledgeGraph {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RelatedSearch {
    #[serde(default)]
    query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ImagesResponse {
    #[serde(default, deserialize_with = "null_default")]
    images: Vec<Image>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Image {
    #[serde(default)]
    image_url: Option<String>,
}

/// Normalise a Serper search response.
pub(crate) fn parse_response(
    body: &str,
    query: &str,
    max_results: usize,
) -> Result<SearchResponse, SearchError> {
    let data: SerperResponse = decode(Provider::Serper, body)?;

    let mut response = SearchResponse::new(Provider::Serper, query);
    response.results = data
        .organic
        .into_iter()
        .take(max_results)
        .enumerate()
        .map(|(i, item)| SearchResult {
            title: item.title,
            url: item.link,
            snippet: item.snippet,
            score: rank_score(i, 0.1),
            date: item.date,
            provider: Provider::Serper,
            raw_content: None,
        })
        .collect();

    let non_empty = |s: &Option<String>| s.as_ref().filter(|s| !s.is_empty()).cloned();
    response.answer = data
        .answer_box
        .as_ref()
        .and_then(|b| non_empty(&b.answer).or_else(|| non_empty(&b.snippet)))
        .or_else(|| data.knowledge_graph.as_ref().and_then(|k| non_empty(&k.description)))
        .or_else(|| response.results.first().map(|r| r.snippet.clone()))
        .unwrap_or_default();

    response.related = data
        .related_searches
        .into_iter()
        .filter_map(|r| r.query)
        .collect();
    Ok(response)
}

fn parse_images(body: &str) -> Result<Vec<String>, SearchError> {
    let data: ImagesResponse = decode(Provider::Serper, body)?;
    Ok(data
        .images
        .into_iter()
        .filter_map(|i| i.image_url.filter(|u| !u.is_empty()))
        .take(IMAGE_COUNT)
        .collect())
}
