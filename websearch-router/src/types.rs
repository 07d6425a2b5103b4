//! Core types for provider identification and normalised search results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Search providers the router can dispatch to.
///
/// Declaration order is the canonical order used when nothing else
/// (priority list, scores) decides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google results via Serper; shopping, local and news queries.
    Serper,
    /// Research-oriented search with synthesised answers.
    Tavily,
    /// Neural discovery search and find-similar.
    Exa,
    /// You.com: LLM-ready snippets from web and news.
    You,
    /// Self-hosted privacy-first meta-search.
    Searxng,
}

impl Provider {
    /// Returns the lowercase identifier used in config files and the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Serper => "serper",
            Self::Tavily => "tavily",
            Self::Exa => "exa",
            Self::You => "you",
            Self::Searxng => "searxng",
        }
    }

    /// Environment variable consulted when the config file has no credential.
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Serper => "SERPER_API_KEY",
            Self::Tavily => "TAVILY_API_KEY",
            Self::Exa => "EXA_API_KEY",
            Self::You => "YOU_API_KEY",
            Self::Searxng => "SEARXNG_INSTANCE_URL",
        }
    }

    /// Where a user obtains a credential (or sets up an instance).
    pub fn signup_url(&self) -> &'static str {
        match self {
            Self::Serper => "https://serper.dev",
            Self::Tavily => "https://tavily.com",
            Self::Exa => "https://exa.ai",
            Self::You => "https://api.you.com",
            Self::Searxng => "https://docs.searxng.org/admin/installation.html",
        }
    }

    /// Self-hosted providers are configured with an instance URL, not a key.
    pub fn is_self_hosted(&self) -> bool {
        matches!(self, Self::Searxng)
    }

    /// Returns all providers in canonical order.
    pub fn all() -> &'static [Provider] {
        &[
            Self::Serper,
            Self::Tavily,
            Self::Exa,
            Self::You,
            Self::Searxng,
        ]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| format!("unknown provider: {s}"))
    }
}

/// A single normalised search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title.
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Text snippet summarising the page.
    pub snippet: String,
    /// Provider-relative relevance score (higher is better).
    pub score: f64,
    /// Publication or crawl date, when the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Provider that returned this hit.
    pub provider: Provider,
    /// Full page text, when the provider was asked for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

/// Normalised response from one provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Provider that answered.
    pub provider: Provider,
    /// Query as sent (or a description for similar-URL searches).
    pub query: String,
    /// Ranked hits.
    pub results: Vec<SearchResult>,
    /// Direct answer or best snippet; empty when none.
    pub answer: String,
    /// Image URLs, when requested and supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Related searches or suggestions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
    /// News hits reported alongside the main results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<SearchResult>,
}

impl SearchResponse {
    /// An empty response shell for `provider`.
    pub fn new(provider: Provider, query: impl Into<String>) -> Self {
        Self {
            provider,
            query: query.into(),
            results: Vec::new(),
            answer: String::new(),
            images: Vec::new(),
            related: Vec::new(),
            news: Vec::new(),
        }
    }
}

/// Round `value` to `places` decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
