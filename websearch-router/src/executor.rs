//! Sequential fallback across providers.
//!
//! Attempts run one at a time: the decision's provider first, then every
//! other available provider in priority order. Each provider is tried at
//! most once. The first success wins; if all fail, every attempt error is
//! returned together with the decision.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::RouterConfig;
use crate::credentials;
use crate::error::{AggregateFailure, AttemptError, SearchError};
use crate::provider::{ProviderBackend, SearchRequest};
use crate::router::{self, ConfidenceLevel, RoutingDecision, RoutingReason};
use crate::signals::SignalMatch;
use crate::types::{Provider, SearchResponse};

/// Routing details attached to a successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingMetadata {
    /// Provider chosen by the router rather than pinned by the caller.
    pub auto_routed: bool,
    /// Provider that produced the results.
    pub provider: Provider,
    /// Provider the decision chose, when a fallback answered instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_provider: Option<Provider>,
    pub fallback_used: bool,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub reason: RoutingReason,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_signals: Vec<SignalMatch>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub scores: BTreeMap<Provider, f64>,
    /// Failures before the successful attempt.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallback_errors: Vec<AttemptError>,
}

/// A successful search with its routing metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    #[serde(flatten)]
    pub response: SearchResponse,
    pub routing: RoutingMetadata,
}

/// Runs a routing decision through the fallback chain.
#[derive(Debug)]
pub struct FallbackExecutor<'a, B> {
    config: &'a RouterConfig,
    backend: B,
}

impl<'a, B: ProviderBackend> FallbackExecutor<'a, B> {
    pub fn new(config: &'a RouterConfig, backend: B) -> Self {
        Self { config, backend }
    }

    /// Providers in the order they will be tried for `decision`.
    ///
    /// The decision's provider always comes first. The rest are drawn from
    /// the priority list, skipping disabled, repeated and unavailable
    /// providers.
    pub fn attempt_order(&self, decision: &RoutingDecision) -> Vec<Provider> {
        let available = router::available_providers(self.config);
        let mut order = vec![decision.provider];
        for &p in &self.config.auto_routing.provider_priority {
            if !order.contains(&p) && !self.config.is_disabled(p) && available.contains(&p) {
                order.push(p);
            }
        }
        order
    }

    /// Execute `request`, starting with the provider `decision` chose.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Exhausted`] when every attempt failed. No other
    /// error escapes: per-provider failures are recorded and skipped.
    pub async fn execute(
        &self,
        decision: RoutingDecision,
        request: &SearchRequest,
    ) -> Result<SearchOutcome, SearchError> {
        let order = self.attempt_order(&decision);
        let mut errors: Vec<AttemptError> = Vec::new();

        for (attempt, &provider) in order.iter().enumerate() {
            tracing::debug!(%provider, attempt, "trying provider");
            match self.attempt(provider, request).await {
                Ok(response) => {
                    if !errors.is_empty() {
                        tracing::info!(
                            original = %decision.provider,
                            %provider,
                            failures = errors.len(),
                            "fallback provider succeeded"
                        );
                    }
                    return Ok(annotate(response, &decision, errors));
                }
                Err(e) => {
                    let next = order.get(attempt + 1);
                    tracing::warn!(
                        %provider,
                        error = %e,
                        next = ?next,
                        "provider attempt failed"
                    );
                    errors.push(AttemptError::new(provider, &e));
                }
            }
        }

        Err(SearchError::Exhausted(Box::new(AggregateFailure {
            errors,
            decision,
        })))
    }

    async fn attempt(
        &self,
        provider: Provider,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        let credential = credentials::resolve(self.config, provider)?;
        self.backend.search(provider, &credential, request).await
    }
}

fn annotate(
    response: SearchResponse,
    decision: &RoutingDecision,
    fallback_errors: Vec<AttemptError>,
) -> SearchOutcome {
    let fallback_used = response.provider != decision.provider;
    SearchOutcome {
        routing: RoutingMetadata {
            auto_routed: decision.is_auto_routed(),
            provider: response.provider,
            original_provider: fallback_used.then_some(decision.provider),
            fallback_used,
            confidence: decision.confidence,
            confidence_level: decision.confidence_level,
            reason: decision.reason,
            top_signals: decision.top_signals.clone(),
            scores: decision.scores.clone(),
            fallback_errors,
        },
        response,
    }
}
