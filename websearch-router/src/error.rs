//! Error types for the websearch-router crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys appear in error messages.

use std::fmt;

use serde::Serialize;

use crate::router::RoutingDecision;
use crate::types::Provider;

/// Errors that can occur while routing or executing a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid routing or provider configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A provider's API key or instance URL is missing or malformed.
    #[error("credential error for {provider}: {message}")]
    Credential {
        /// Provider whose credential failed validation.
        provider: Provider,
        /// Human-readable explanation, including how to fix it.
        message: String,
    },

    /// Network failure or timeout talking to a provider.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx status.
    #[error("provider error: {message} (HTTP {status})")]
    Provider {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Friendly message for the status code.
        message: String,
    },

    /// The provider answered 2xx but the body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Every candidate provider in the fallback chain failed.
    #[error("all providers failed: {0}")]
    Exhausted(Box<AggregateFailure>),
}

impl SearchError {
    /// Short, stable name of the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Credential { .. } => ErrorKind::Credential,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Exhausted(_) => ErrorKind::Exhausted,
        }
    }
}

/// Category of a [`SearchError`], used in attempt records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Configuration problem.
    Config,
    /// Missing or invalid credential.
    Credential,
    /// Network failure or timeout.
    Transport,
    /// Non-2xx provider response.
    Provider,
    /// Undecodable provider response.
    Parse,
    /// Fallback chain exhausted.
    Exhausted,
}

/// One failed provider attempt inside a fallback chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptError {
    /// Provider that was attempted.
    pub provider: Provider,
    /// Error category.
    pub kind: ErrorKind,
    /// Display form of the error.
    pub message: String,
}

impl AttemptError {
    /// Record a failed attempt against `provider`.
    pub fn new(provider: Provider, error: &SearchError) -> Self {
        Self {
            provider,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Aggregate failure returned when every candidate provider failed.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateFailure {
    /// Per-provider errors in attempt order.
    pub errors: Vec<AttemptError>,
    /// The routing decision that started the chain.
    pub decision: RoutingDecision,
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("no providers attempted");
        }
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.provider, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Convenience type alias for websearch-router results.
pub type Result<T> = std::result::Result<T, SearchError>;
