//! Command-line arguments.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use websearch_router::{Provider, RouterConfig, SearchRequest, TimeRange};

/// Provider selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderChoice {
    /// Route by query intent.
    #[default]
    Auto,
    /// Pin one provider (it still falls back on failure).
    Fixed(Provider),
}

impl ProviderChoice {
    /// The pinned provider, if any.
    pub fn pinned(self) -> Option<Provider> {
        match self {
            Self::Auto => None,
            Self::Fixed(p) => Some(p),
        }
    }
}

impl FromStr for ProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse::<Provider>().map(Self::Fixed)
    }
}

impl fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(p) => p.fmt(f),
        }
    }
}

/// websearch: multi-provider web search with intent-based routing.
///
/// Queries are routed to Serper, Tavily, Exa, You.com or SearXNG by
/// intent, falling back through the remaining providers on failure.
#[derive(Debug, Parser)]
#[command(name = "websearch", version, about)]
pub struct Args {
    /// Search query.
    #[arg(short, long)]
    pub query: Option<String>,

    /// serper, tavily, exa, you, searxng or auto.
    #[arg(short, long, default_value = "auto")]
    pub provider: ProviderChoice,

    /// Maximum results (defaults to the configured value).
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    /// Print the routing analysis instead of searching.
    #[arg(long)]
    pub explain_routing: bool,

    /// Single-line JSON output.
    #[arg(long)]
    pub compact: bool,

    /// Path to a TOML or JSON configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// hour, day, week, month or year.
    #[arg(long)]
    pub time_range: Option<TimeRange>,

    /// Include image URLs (Serper, Tavily).
    #[arg(long)]
    pub images: bool,

    /// Country code (Serper, You.com).
    #[arg(long)]
    pub country: Option<String>,

    /// Language code (Serper, You.com, SearXNG).
    #[arg(long)]
    pub language: Option<String>,

    /// Serper search vertical.
    #[arg(long = "type", value_parser = ["search", "news", "images", "videos", "places", "shopping"])]
    pub search_type: Option<String>,

    /// Tavily search depth.
    #[arg(long, value_parser = ["basic", "advanced"])]
    pub depth: Option<String>,

    /// Tavily topic.
    #[arg(long, value_parser = ["general", "news"])]
    pub topic: Option<String>,

    /// Include each page's full text (Tavily).
    #[arg(long)]
    pub raw_content: bool,

    /// Exa search type.
    #[arg(long, value_parser = ["neural", "keyword"])]
    pub exa_type: Option<String>,

    /// Exa content category.
    #[arg(long, value_parser = [
        "company", "research paper", "news", "pdf", "github",
        "tweet", "personal site", "linkedin profile",
    ])]
    pub category: Option<String>,

    /// Exa earliest publication date (YYYY-MM-DD).
    #[arg(long)]
    pub start_date: Option<String>,

    /// Exa latest publication date (YYYY-MM-DD).
    #[arg(long)]
    pub end_date: Option<String>,

    /// Find pages similar to this URL (Exa).
    #[arg(long)]
    pub similar_url: Option<String>,

    /// You.com freshness filter.
    #[arg(long, value_parser = ["day", "week", "month", "year"])]
    pub freshness: Option<String>,

    /// Fetch full page content (You.com).
    #[arg(long, value_parser = ["web", "news", "all"])]
    pub livecrawl: Option<String>,

    /// Include news hits, true or false (You.com, default true).
    #[arg(long, value_name = "BOOL")]
    pub include_news: Option<bool>,

    /// You.com SafeSearch.
    #[arg(long, value_parser = ["off", "moderate", "strict"])]
    pub you_safesearch: Option<String>,

    /// SearXNG instance URL.
    #[arg(long)]
    pub searxng_url: Option<String>,

    /// SearXNG SafeSearch: 0 off, 1 moderate, 2 strict.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub searxng_safesearch: Option<u8>,

    /// SearXNG engines.
    #[arg(long, num_args = 1..)]
    pub engines: Vec<String>,

    /// SearXNG categories.
    #[arg(long, num_args = 1..)]
    pub categories: Vec<String>,

    /// Only return results from these domains (Tavily, Exa).
    #[arg(long, num_args = 1..)]
    pub include_domains: Vec<String>,

    /// Exclude results from these domains (Tavily, Exa).
    #[arg(long, num_args = 1..)]
    pub exclude_domains: Vec<String>,
}

impl Args {
    /// Query text, empty when only a similar URL was given.
    pub fn query_text(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }

    /// Apply instance-level flags to the loaded configuration.
    pub fn apply_to(&self, config: &mut RouterConfig) {
        if let Some(url) = &self.searxng_url {
            config.searxng.instance_url = Some(url.clone());
        }
        if let Some(level) = self.searxng_safesearch {
            config.searxng.safesearch = level;
        }
        if let Some(level) = &self.you_safesearch {
            config.you.safesearch = level.clone();
        }
    }

    /// Build the search request, filling unset values from `config`.
    pub fn request(&self, config: &RouterConfig) -> SearchRequest {
        let mut request = SearchRequest::new(
            self.query_text(),
            self.max_results.unwrap_or(config.defaults.max_results),
        );
        request.time_range = self.time_range;
        request.include_images = self.images;
        request.include_domains = self.include_domains.clone();
        request.exclude_domains = self.exclude_domains.clone();
        request.similar_url = self.similar_url.clone();

        let overrides = &mut request.overrides;
        overrides.country = self.country.clone();
        overrides.language = self.language.clone();
        overrides.serper_type = self.search_type.clone();
        overrides.depth = self.depth.clone();
        overrides.topic = self.topic.clone();
        overrides.include_raw_content = self.raw_content;
        overrides.exa_type = self.exa_type.clone();
        overrides.category = self.category.clone();
        overrides.start_date = self.start_date.clone();
        overrides.end_date = self.end_date.clone();
        overrides.freshness = self.freshness.clone();
        overrides.livecrawl = self.livecrawl.clone();
        overrides.include_news = self.include_news;
        overrides.engines = self.engines.clone();
        overrides.categories = self.categories.clone();
        request
    }

    /// Reject argument combinations that cannot produce a search.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message.
    pub fn check(&self) -> Result<(), String> {
        let has_query = !self.query_text().trim().is_empty();
        if self.explain_routing && !has_query {
            return Err("--query is required for --explain-routing".into());
        }
        let has_similar = self
            .similar_url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty());
        if !has_query && !has_similar {
            return Err("--query is required (unless using --similar-url with Exa)".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("websearch").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn provider_choice_parses_auto_and_names() {
        assert_eq!("auto".parse::<ProviderChoice>(), Ok(ProviderChoice::Auto));
        assert_eq!(
            "SearXNG".parse::<ProviderChoice>(),
            Ok(ProviderChoice::Fixed(Provider::Searxng))
        );
        assert!("bing".parse::<ProviderChoice>().is_err());
        assert_eq!(ProviderChoice::Fixed(Provider::Exa).to_string(), "exa");
    }

    #[test]
    fn defaults_to_auto_routing() {
        let args = parse(&["-q", "rust"]);
        assert_eq!(args.provider, ProviderChoice::Auto);
        assert_eq!(args.provider.pinned(), None);
        assert!(!args.compact);
    }

    #[test]
    fn request_takes_flags_and_config_defaults() {
        let args = parse(&[
            "-q",
            "privacy tools",
            "-p",
            "searxng",
            "--time-range",
            "week",
            "--engines",
            "duckduckgo",
            "brave",
            "--include-domains",
            "example.org",
            "--depth",
            "advanced",
        ]);
        let mut config = RouterConfig::default();
        config.defaults.max_results = 7;
        let request = args.request(&config);

        assert_eq!(args.provider.pinned(), Some(Provider::Searxng));
        assert_eq!(request.query, "privacy tools");
        assert_eq!(request.max_results, 7);
        assert_eq!(request.time_range, Some(TimeRange::Week));
        assert_eq!(request.overrides.engines, vec!["duckduckgo", "brave"]);
        assert_eq!(request.include_domains, vec!["example.org"]);
        assert_eq!(request.overrides.depth.as_deref(), Some("advanced"));
        assert_eq!(request.overrides.country, None);
        assert!(!request.overrides.include_raw_content);
        assert_eq!(request.overrides.include_news, None);
    }

    #[test]
    fn content_flags_reach_overrides() {
        let args = parse(&[
            "-q",
            "rust release notes",
            "--raw-content",
            "--livecrawl",
            "news",
            "--include-news",
            "false",
        ]);
        let request = args.request(&RouterConfig::default());
        assert!(request.overrides.include_raw_content);
        assert_eq!(request.overrides.livecrawl.as_deref(), Some("news"));
        assert_eq!(request.overrides.include_news, Some(false));

        let argv = ["websearch", "-q", "x", "--livecrawl", "everything"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn invalid_choices_rejected() {
        let argv = ["websearch", "-q", "x", "--depth", "extreme"];
        assert!(Args::try_parse_from(argv).is_err());
        let argv = ["websearch", "-q", "x", "--searxng-safesearch", "3"];
        assert!(Args::try_parse_from(argv).is_err());
        let argv = ["websearch", "-q", "x", "--time-range", "decade"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn instance_flags_override_config() {
        let args = parse(&[
            "-q",
            "x",
            "--searxng-url",
            "http://localhost:8080",
            "--searxng-safesearch",
            "2",
            "--you-safesearch",
            "strict",
        ]);
        let mut config = RouterConfig::default();
        args.apply_to(&mut config);
        assert_eq!(
            config.searxng.instance_url.as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(config.searxng.safesearch, 2);
        assert_eq!(config.you.safesearch, "strict");
    }

    #[test]
    fn query_or_similar_url_required() {
        assert!(parse(&[]).check().is_err());
        assert!(parse(&["--similar-url", "https://linear.app"]).check().is_ok());
        let err = parse(&["--explain-routing", "--similar-url", "https://linear.app"])
            .check()
            .unwrap_err();
        assert!(err.contains("--explain-routing"));
    }
}
