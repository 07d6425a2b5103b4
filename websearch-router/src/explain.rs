//! Diagnostic view of a routing decision.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analyzer::{self, QueryAnalysis};
use crate::config::RouterConfig;
use crate::router::{self, RoutingDecision};
use crate::types::Provider;

/// Everything that went into routing one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingExplanation {
    pub query: String,
    pub routing_decision: RoutingDecision,
    /// Providers that passed the availability filter, in canonical order.
    pub available_providers: Vec<Provider>,
    /// Number of matched signals supporting each provider.
    pub intent_breakdown: BTreeMap<Provider, usize>,
    pub query_analysis: QueryAnalysis,
}

/// Analyze and route `query`, keeping the intermediate results.
pub fn explain(query: &str, config: &RouterConfig) -> RoutingExplanation {
    let analysis = analyzer::analyze(query);
    let decision = router::route_analysis(&analysis, config);
    let intent_breakdown = Provider::all()
        .iter()
        .map(|&p| (p, analysis.provider_signals(p).len()))
        .collect();

    RoutingExplanation {
        query: query.to_string(),
        routing_decision: decision,
        available_providers: router::available_providers(config),
        intent_breakdown,
        query_analysis: analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_counts_signals_per_provider() {
        let mut config = RouterConfig::default();
        config.serper.api_key = Some("serper-key-0123".into());
        let explanation = explain("cheap hotels nearby", &config);

        assert_eq!(explanation.intent_breakdown[&Provider::Serper], 3);
        assert_eq!(explanation.intent_breakdown[&Provider::Exa], 0);
        assert_eq!(explanation.available_providers, vec![Provider::Serper]);
        assert_eq!(explanation.routing_decision.provider, Provider::Serper);
    }

    #[test]
    fn explanation_matches_plain_route() {
        let mut config = RouterConfig::default();
        config.exa.api_key = Some("exa-key-012345".into());
        config.tavily.api_key = Some("tvly-key-01234".into());
        let query = "alternatives to notion for note taking";
        assert_eq!(
            explain(query, &config).routing_decision,
            router::route(query, &config)
        );
    }

    #[test]
    fn serializes_to_json_object() {
        let json = serde_json::to_value(explain("weather", &RouterConfig::default()))
            .expect("serialize");
        assert_eq!(json["routing_decision"]["reason"], "no_available_providers");
        assert!(json["query_analysis"]["complexity"]["word_count"].is_number());
    }
}
