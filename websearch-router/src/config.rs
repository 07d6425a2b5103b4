//! Routing and provider configuration with sensible defaults.
//!
//! [`RouterConfig`] is deserialised from the user's config file (every
//! section is optional) and then treated as immutable for the lifetime of
//! a routing decision and its execution. Credentials found in the
//! environment are merged in once, up front, so that routing never reads
//! process state.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::Provider;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default confidence threshold below which a decision is flagged.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Top-level configuration consumed by the router and executor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Request defaults.
    pub defaults: DefaultsConfig,
    /// Automatic routing behaviour.
    pub auto_routing: AutoRoutingConfig,
    /// Serper (Google) settings.
    pub serper: SerperSettings,
    /// Tavily settings.
    pub tavily: TavilySettings,
    /// Exa settings.
    pub exa: ExaSettings,
    /// You.com settings.
    pub you: YouSettings,
    /// SearXNG settings.
    pub searxng: SearxngSettings,
}

/// Request defaults applied when the caller does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Provider used when auto-routing is disabled and none is given.
    pub provider: Provider,
    /// Maximum number of results per search.
    pub max_results: usize,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Serper,
            max_results: 5,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Automatic routing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoRoutingConfig {
    /// Whether queries are routed automatically when no provider is given.
    pub enabled: bool,
    /// Provider reported when no provider is available at all.
    pub fallback_provider: Provider,
    /// Tie-break order and fallback-chain order.
    pub provider_priority: Vec<Provider>,
    /// Providers never routed to or attempted in fallback.
    pub disabled_providers: Vec<Provider>,
    /// Decisions below this confidence are flagged `below_threshold`.
    pub confidence_threshold: f64,
}

impl Default for AutoRoutingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fallback_provider: Provider::Serper,
            provider_priority: Provider::all().to_vec(),
            disabled_providers: Vec::new(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Serper (Google Search API) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerperSettings {
    /// API key; falls back to `SERPER_API_KEY`.
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,
    /// Endpoint override, mainly for testing.
    pub base_url: Option<String>,
    /// Two-letter country code (`gl`).
    pub country: String,
    /// Interface language (`hl`).
    pub language: String,
    /// Search vertical: search, news, images, videos, places, shopping.
    #[serde(rename = "type")]
    pub search_type: String,
}

impl Default for SerperSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            country: "us".into(),
            language: "en".into(),
            search_type: "search".into(),
        }
    }
}

/// Tavily settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TavilySettings {
    /// API key; falls back to `TAVILY_API_KEY`.
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,
    /// Endpoint override, mainly for testing.
    pub base_url: Option<String>,
    /// `basic` or `advanced`.
    pub depth: String,
    /// `general` or `news`.
    pub topic: String,
}

impl Default for TavilySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            depth: "basic".into(),
            topic: "general".into(),
        }
    }
}

/// Exa settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExaSettings {
    /// API key; falls back to `EXA_API_KEY`.
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,
    /// Endpoint override, mainly for testing.
    pub base_url: Option<String>,
    /// `neural` or `keyword`.
    #[serde(rename = "type")]
    pub search_type: String,
}

impl Default for ExaSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            search_type: "neural".into(),
        }
    }
}

/// You.com settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YouSettings {
    /// API key; falls back to `YOU_API_KEY`.
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,
    /// Endpoint override, mainly for testing.
    pub base_url: Option<String>,
    /// Country code, sent upper-cased.
    pub country: String,
    /// Language code, sent upper-cased.
    pub language: String,
    /// `off`, `moderate` or `strict`.
    pub safesearch: String,
}

impl Default for YouSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            country: "us".into(),
            language: "en".into(),
            safesearch: "moderate".into(),
        }
    }
}

/// SearXNG (self-hosted) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearxngSettings {
    /// Instance URL; falls back to `SEARXNG_INSTANCE_URL`.
    pub instance_url: Option<String>,
    /// 0 = off, 1 = moderate, 2 = strict.
    pub safesearch: u8,
    /// Upstream engines to query; empty means the instance default.
    pub engines: Vec<String>,
    /// Language code.
    pub language: String,
}

impl Default for SearxngSettings {
    fn default() -> Self {
        Self {
            instance_url: None,
            safesearch: 0,
            engines: Vec::new(),
            language: "en".into(),
        }
    }
}

impl RouterConfig {
    /// Validates this configuration, returning the first invalid field.
    ///
    /// Checks:
    /// - `defaults.max_results` and `defaults.timeout_seconds` are > 0
    /// - `auto_routing.confidence_threshold` is within `[0, 1]`
    /// - `auto_routing.provider_priority` has no duplicates
    /// - `searxng.safesearch` is 0, 1 or 2
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.defaults.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.defaults.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.auto_routing.confidence_threshold) {
            return Err(SearchError::Config(
                "confidence_threshold must be within [0, 1]".into(),
            ));
        }
        if has_duplicates(&self.auto_routing.provider_priority) {
            return Err(SearchError::Config(
                "provider_priority must not repeat a provider".into(),
            ));
        }
        if self.searxng.safesearch > 2 {
            return Err(SearchError::Config(
                "searxng safesearch must be 0, 1 or 2".into(),
            ));
        }
        Ok(())
    }

    /// Replace every invalid field with its default, logging a warning per
    /// repair. Configuration problems are never fatal.
    pub fn sanitized(mut self) -> Self {
        let defaults = DefaultsConfig::default();
        if self.defaults.max_results == 0 {
            tracing::warn!(
                default = defaults.max_results,
                "max_results must be greater than 0, using default"
            );
            self.defaults.max_results = defaults.max_results;
        }
        if self.defaults.timeout_seconds == 0 {
            tracing::warn!(
                default = defaults.timeout_seconds,
                "timeout_seconds must be greater than 0, using default"
            );
            self.defaults.timeout_seconds = defaults.timeout_seconds;
        }
        let threshold = self.auto_routing.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            tracing::warn!(
                threshold,
                default = DEFAULT_CONFIDENCE_THRESHOLD,
                "confidence_threshold out of range, using default"
            );
            self.auto_routing.confidence_threshold = DEFAULT_CONFIDENCE_THRESHOLD;
        }
        if has_duplicates(&self.auto_routing.provider_priority) {
            tracing::warn!("provider_priority repeats a provider, keeping first occurrences");
            let mut seen = Vec::new();
            self.auto_routing.provider_priority.retain(|p| {
                let first = !seen.contains(p);
                if first {
                    seen.push(*p);
                }
                first
            });
        }
        if self.searxng.safesearch > 2 {
            tracing::warn!(
                safesearch = self.searxng.safesearch,
                "searxng safesearch must be 0, 1 or 2, using 0"
            );
            self.searxng.safesearch = 0;
        }
        self
    }

    /// Fill credentials missing from the config using `lookup` (normally
    /// the process environment). Values already in the config win.
    pub fn merge_env_credentials<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for &provider in Provider::all() {
            let slot = self.credential_slot_mut(provider);
            let configured = slot.as_deref().is_some_and(|v| !v.trim().is_empty());
            if !configured {
                if let Some(value) = lookup(provider.env_var()).filter(|v| !v.trim().is_empty()) {
                    tracing::debug!(%provider, var = provider.env_var(), "credential taken from environment");
                    *slot = Some(value);
                }
            }
        }
        self
    }

    /// Raw credential for `provider`: API key, or instance URL for SearXNG.
    pub fn credential(&self, provider: Provider) -> Option<&str> {
        let value = match provider {
            Provider::Serper => &self.serper.api_key,
            Provider::Tavily => &self.tavily.api_key,
            Provider::Exa => &self.exa.api_key,
            Provider::You => &self.you.api_key,
            Provider::Searxng => &self.searxng.instance_url,
        };
        value.as_deref()
    }

    /// Endpoint override for `provider`, if any. SearXNG has none: its
    /// instance URL is the endpoint.
    pub fn base_url(&self, provider: Provider) -> Option<&str> {
        let value = match provider {
            Provider::Serper => &self.serper.base_url,
            Provider::Tavily => &self.tavily.base_url,
            Provider::Exa => &self.exa.base_url,
            Provider::You => &self.you.base_url,
            Provider::Searxng => return None,
        };
        value.as_deref()
    }

    /// Whether `provider` is listed in `disabled_providers`.
    pub fn is_disabled(&self, provider: Provider) -> bool {
        self.auto_routing.disabled_providers.contains(&provider)
    }

    fn credential_slot_mut(&mut self, provider: Provider) -> &mut Option<String> {
        match provider {
            Provider::Serper => &mut self.serper.api_key,
            Provider::Tavily => &mut self.tavily.api_key,
            Provider::Exa => &mut self.exa.api_key,
            Provider::You => &mut self.you.api_key,
            Provider::Searxng => &mut self.searxng.instance_url,
        }
    }
}

fn has_duplicates(providers: &[Provider]) -> bool {
    providers
        .iter()
        .enumerate()
        .any(|(i, p)| providers[..i].contains(p))
}
