//! JSON documents written by the binary.

use serde::Serialize;
use websearch_router::{AggregateFailure, AttemptError, Provider, RoutingDecision, SearchError};

use crate::error::Result;

/// Serialise `value`, indented unless `compact`.
///
/// # Errors
///
/// Returns [`crate::AppError::Output`] if serialisation fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<String> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(text)
}

/// Written to stderr when every provider failed.
#[derive(Debug, Serialize)]
pub struct FailureReport<'a> {
    pub error: &'static str,
    /// Provider the routing decision chose.
    pub provider: Provider,
    pub query: &'a str,
    pub routing: &'a RoutingDecision,
    pub provider_errors: &'a [AttemptError],
}

impl<'a> FailureReport<'a> {
    pub fn new(query: &'a str, failure: &'a AggregateFailure) -> Self {
        Self {
            error: "All providers failed",
            provider: failure.decision.provider,
            query,
            routing: &failure.decision,
            provider_errors: &failure.errors,
        }
    }
}

/// Error document for `error`: the full failure report on exhaustion, a
/// bare message otherwise.
pub fn error_value(query: &str, error: &SearchError) -> serde_json::Value {
    match error {
        SearchError::Exhausted(failure) => serde_json::to_value(FailureReport::new(query, failure))
            .unwrap_or_else(|_| serde_json::json!({ "error": error.to_string() })),
        other => serde_json::json!({ "error": other.to_string() }),
    }
}
