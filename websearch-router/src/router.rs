//! Provider selection with confidence scoring.
//!
//! [`route`] is pure: it reads only the query and the configuration (whose
//! credentials were merged from the environment when it was loaded).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::{self, QueryAnalysis};
use crate::config::RouterConfig;
use crate::credentials;
use crate::signals::SignalMatch;
use crate::types::{round_to, Provider};

/// Provider score at which score strength saturates.
const SCORE_CEILING: f64 = 15.0;

/// Weight of absolute score strength in the confidence.
const STRENGTH_WEIGHT: f64 = 0.6;

/// Weight of the margin over the runner-up in the confidence.
const MARGIN_WEIGHT: f64 = 0.4;

/// Number of winner signals reported in a decision.
const TOP_SIGNALS: usize = 5;

/// Scores closer than this are treated as tied.
const TIE_EPSILON: f64 = 1e-9;

/// Coarse bucket for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// `>= 0.7` is high, `>= 0.4` medium, anything else low.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.7 {
            Self::High
        } else if confidence >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Why a provider was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingReason {
    /// No provider is enabled and credentialed; the fallback was reported.
    NoAvailableProviders,
    /// Every available provider scored zero.
    NoSignalsMatched,
    HighConfidenceMatch,
    ModerateConfidenceMatch,
    LowConfidenceMatch,
    /// The caller pinned a provider.
    ExplicitProvider,
    /// A similar-URL search, which only Exa supports.
    SimilarUrlSpecified,
}

impl RoutingReason {
    /// Snake-case code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoAvailableProviders => "no_available_providers",
            Self::NoSignalsMatched => "no_signals_matched",
            Self::HighConfidenceMatch => "high_confidence_match",
            Self::ModerateConfidenceMatch => "moderate_confidence_match",
            Self::LowConfidenceMatch => "low_confidence_match",
            Self::ExplicitProvider => "explicit_provider",
            Self::SimilarUrlSpecified => "similar_url_specified",
        }
    }

    fn for_level(level: ConfidenceLevel) -> Self {
        match level {
            ConfidenceLevel::High => Self::HighConfidenceMatch,
            ConfidenceLevel::Medium => Self::ModerateConfidenceMatch,
            ConfidenceLevel::Low => Self::LowConfidenceMatch,
        }
    }
}

impl fmt::Display for RoutingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compact view of the analysis behind an automatic decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// Word count.
    pub query_length: usize,
    pub is_complex: bool,
    pub has_url: bool,
    pub recency_focused: bool,
}

impl From<&QueryAnalysis> for AnalysisSummary {
    fn from(analysis: &QueryAnalysis) -> Self {
        Self {
            query_length: analysis.complexity.word_count,
            is_complex: analysis.complexity.is_complex,
            has_url: analysis.detected_url.is_some(),
            recency_focused: analysis.recency.is_recency,
        }
    }
}

/// Outcome of routing one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    /// Chosen provider.
    pub provider: Provider,
    /// Confidence in `[0, 1]`, rounded to three places.
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub reason: RoutingReason,
    /// Score of every available provider, rounded to two places.
    pub scores: BTreeMap<Provider, f64>,
    /// Winner's score, rounded to two places.
    pub winning_score: f64,
    /// Winner's strongest signals, by weight, at most five.
    pub top_signals: Vec<SignalMatch>,
    /// Confidence fell below the configured threshold. Informational only.
    pub below_threshold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_summary: Option<AnalysisSummary>,
}

impl RoutingDecision {
    /// Decision for a caller-pinned provider.
    pub fn explicit(provider: Provider) -> Self {
        Self::fixed(provider, 0.0, RoutingReason::ExplicitProvider)
    }

    /// Decision for an Exa similar-URL search without query text.
    pub fn similar_url() -> Self {
        Self::fixed(Provider::Exa, 1.0, RoutingReason::SimilarUrlSpecified)
    }

    fn fixed(provider: Provider, confidence: f64, reason: RoutingReason) -> Self {
        Self {
            provider,
            confidence,
            confidence_level: ConfidenceLevel::from_confidence(confidence),
            reason,
            scores: BTreeMap::new(),
            winning_score: 0.0,
            top_signals: Vec::new(),
            below_threshold: false,
            analysis_summary: None,
        }
    }

    /// Whether the provider was picked by the router rather than the caller.
    pub fn is_auto_routed(&self) -> bool {
        self.reason != RoutingReason::ExplicitProvider
    }
}

/// Providers that are enabled and hold a valid credential, in canonical order.
pub fn available_providers(config: &RouterConfig) -> Vec<Provider> {
    Provider::all()
        .iter()
        .copied()
        .filter(|&p| credentials::is_available(config, p))
        .collect()
}

/// Analyze `query` and pick a provider for it.
pub fn route(query: &str, config: &RouterConfig) -> RoutingDecision {
    let analysis = analyzer::analyze(query);
    route_analysis(&analysis, config)
}

/// Pick a provider for an existing analysis.
pub fn route_analysis(analysis: &QueryAnalysis, config: &RouterConfig) -> RoutingDecision {
    let auto = &config.auto_routing;
    let available = available_providers(config);
    let summary = AnalysisSummary::from(analysis);

    if available.is_empty() {
        tracing::warn!(
            fallback = %auto.fallback_provider,
            "no search provider is enabled and credentialed"
        );
        let mut decision = RoutingDecision::fixed(
            auto.fallback_provider,
            0.0,
            RoutingReason::NoAvailableProviders,
        );
        decision.below_threshold = 0.0 < auto.confidence_threshold;
        decision.analysis_summary = Some(summary);
        return decision;
    }

    let scored: Vec<(Provider, f64)> = available
        .iter()
        .map(|&p| (p, analysis.provider_score(p)))
        .collect();
    let max_score = scored.iter().map(|&(_, s)| s).fold(0.0, f64::max);
    // Complexity and recency alone are not a signal.
    let no_signals = max_score <= 0.0 || !analysis.has_signals();

    let tied: Vec<Provider> = if no_signals {
        available.clone()
    } else {
        scored
            .iter()
            .filter(|&&(_, s)| (max_score - s).abs() < TIE_EPSILON)
            .map(|&(p, _)| p)
            .collect()
    };
    let winner = auto
        .provider_priority
        .iter()
        .copied()
        .find(|p| tied.contains(p))
        .or_else(|| tied.first().copied())
        .unwrap_or(available[0]);

    let (confidence, reason) = if no_signals {
        (0.0, RoutingReason::NoSignalsMatched)
    } else {
        let confidence = confidence(&scored, max_score);
        let reason = RoutingReason::for_level(ConfidenceLevel::from_confidence(confidence));
        (confidence, reason)
    };

    let mut top_signals: Vec<SignalMatch> = analysis
        .provider_signals(winner)
        .into_iter()
        .cloned()
        .collect();
    top_signals.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    top_signals.truncate(TOP_SIGNALS);

    let decision = RoutingDecision {
        provider: winner,
        confidence,
        confidence_level: ConfidenceLevel::from_confidence(confidence),
        reason,
        scores: scored.iter().map(|&(p, s)| (p, round_to(s, 2))).collect(),
        winning_score: round_to(analysis.provider_score(winner), 2),
        top_signals,
        below_threshold: confidence < auto.confidence_threshold,
        analysis_summary: Some(summary),
    };

    tracing::debug!(
        provider = %decision.provider,
        confidence = decision.confidence,
        reason = %decision.reason,
        below_threshold = decision.below_threshold,
        "routing decision"
    );
    decision
}

/// `round(0.6 * min(max / 15, 1) + 0.4 * margin, 3)` where margin is the
/// winner's lead over the runner-up relative to the winning score.
fn confidence(scored: &[(Provider, f64)], max_score: f64) -> f64 {
    let mut scores: Vec<f64> = scored.iter().map(|&(_, s)| s).collect();
    scores.sort_by(|a, b| b.total_cmp(a));
    let second_best = scores.get(1).copied().unwrap_or(0.0);

    let margin = (max_score - second_best) / max_score;
    let strength = (max_score / SCORE_CEILING).min(1.0);
    round_to(STRENGTH_WEIGHT * strength + MARGIN_WEIGHT * margin, 3).clamp(0.0, 1.0)
}
