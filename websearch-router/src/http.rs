//! HTTP plumbing shared by the provider adapters.
//!
//! Provides a configured [`reqwest::Client`] plus status-code mapping, so
//! each adapter only builds its request and decodes its body.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use url::Url;

use crate::error::SearchError;
use crate::types::Provider;

/// User-Agent sent with every provider request. Some APIs reject requests
/// without one.
pub const USER_AGENT: &str = concat!("websearch/", env!("CARGO_PKG_VERSION"));

/// Longest error body excerpt included in a provider error.
const MAX_ERROR_DETAIL: usize = 500;

/// Client for one provider attempt.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    timeout_secs: u64,
}

impl HttpClient {
    /// Build a client whose requests time out after `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Transport`] if the client cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, SearchError> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| SearchError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            inner,
            timeout_secs,
        })
    }

    /// POST `body` as JSON and return the response text.
    ///
    /// # Errors
    ///
    /// [`SearchError::Transport`] on network failure or timeout,
    /// [`SearchError::Provider`] on a non-2xx status.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        provider: Provider,
        url: &str,
        headers: &[(&'static str, &str)],
        body: &B,
    ) -> Result<String, SearchError> {
        let request = self
            .inner
            .post(url)
            .headers(header_map(headers)?)
            .json(body);
        self.send(provider, request).await
    }

    /// GET `url` and return the response text.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::post_json`].
    pub async fn get(
        &self,
        provider: Provider,
        url: Url,
        headers: &[(&'static str, &str)],
    ) -> Result<String, SearchError> {
        let request = self
            .inner
            .get(url)
            .header(ACCEPT, "application/json")
            .headers(header_map(headers)?);
        self.send(provider, request).await
    }

    async fn send(
        &self,
        provider: Provider,
        request: RequestBuilder,
    ) -> Result<String, SearchError> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(&e, self.timeout_secs))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&e, self.timeout_secs))?;

        if !status.is_success() {
            tracing::debug!(%provider, status = status.as_u16(), "provider returned error status");
            return Err(status_error(provider, status, &body));
        }
        Ok(body)
    }
}

fn header_map(headers: &[(&'static str, &str)]) -> Result<HeaderMap, SearchError> {
    let mut map = HeaderMap::new();
    for &(name, value) in headers {
        let value = HeaderValue::from_str(value).map_err(|_| {
            SearchError::Config(format!("value for header {name} contains invalid characters"))
        })?;
        map.insert(HeaderName::from_static(name), value);
    }
    Ok(map)
}

/// Map a non-2xx response to a [`SearchError::Provider`] with a friendly
/// message.
pub fn status_error(provider: Provider, status: StatusCode, body: &str) -> SearchError {
    let code = status.as_u16();
    let known = match (provider, code) {
        (Provider::Searxng, 403) => Some(
            "JSON API disabled on this SearXNG instance. Enable 'json' in search.formats in settings.yml",
        ),
        (Provider::Searxng, 404) => Some("SearXNG instance not found. Check your instance URL."),
        (_, 401) => Some("Invalid or expired API key. Please check your credentials."),
        (_, 403) => {
            Some("Access forbidden. Your API key may not have permission for this operation.")
        }
        (_, 429) => Some("Rate limit exceeded. Please wait a moment and try again."),
        (_, 500) => Some("Server error. The search provider is experiencing issues."),
        (_, 503) => Some("Service unavailable. The search provider may be down."),
        _ => None,
    };
    let message = match known {
        Some(message) => message.to_string(),
        None => format!("API error: {}", error_detail(body)),
    };
    SearchError::Provider {
        status: code,
        message,
    }
}

/// The body's `error` or `message` field, else its first 500 characters.
fn error_detail(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            match json.get(key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(value) if !value.is_null() => return value.to_string(),
                _ => {}
            }
        }
    }
    body.chars().take(MAX_ERROR_DETAIL).collect()
}

fn transport_error(error: &reqwest::Error, timeout_secs: u64) -> SearchError {
    if error.is_timeout() {
        SearchError::Transport(format!("Request timed out after {timeout_secs}s"))
    } else {
        SearchError::Transport(format!("Network error: {error}"))
    }
}
