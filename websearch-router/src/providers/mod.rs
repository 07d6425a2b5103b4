//! Provider adapter implementations.
//!
//! Each module implements [`crate::provider::SearchProvider`] for one search
//! API and keeps its JSON decoding in a separate `parse_response` function.

pub mod exa;
pub mod searxng;
pub mod serper;
pub mod tavily;
pub mod you;

pub use exa::ExaProvider;
pub use searxng::SearxngProvider;
pub use serper::SerperProvider;
pub use tavily::TavilyProvider;
pub use you::YouProvider;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::SearchError;
use crate::types::Provider;

/// Decode a provider response body.
pub(crate) fn decode<T: DeserializeOwned>(provider: Provider, body: &str) -> Result<T, SearchError> {
    serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid {provider} response: {e}")))
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Configured base URL, else the provider's public endpoint, without a
/// trailing slash.
pub(crate) fn base_url<'a>(configured: Option<&'a str>, default: &'a str) -> &'a str {
    configured
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
}

/// Rank-based score: `1.0 - rank * step`, rounded to three places.
pub(crate) fn rank_score(rank: usize, step: f64) -> f64 {
    crate::types::round_to(1.0 - rank as f64 * step, 3)
}
