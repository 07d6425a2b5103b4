//! Query analysis: category scores, evidence and per-provider scores.
//!
//! # Pipeline
//!
//! 1. Score every intent category against the lower-cased query. Each
//!    pattern adds its weight once, however often it matches.
//! 2. Add the brand/product bonus to shopping.
//! 3. Add the URL bonus to discovery and record the detected URL.
//! 4. Assess complexity; a complex query folds its complexity score into
//!    research as a `query_complexity` signal.
//! 5. Sum recency weights.
//! 6. Combine categories and bonuses into one score per provider.

pub mod detectors;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::signals::{self, IntentCategory, SignalCatalog, SignalMatch};
use crate::types::Provider;

pub use detectors::{Complexity, Recency};

/// Share of the recency score credited to serper.
const SERPER_RECENCY_FACTOR: f64 = 0.5;

/// Share of the recency score credited to you.com.
const YOU_RECENCY_FACTOR: f64 = 0.3;

/// Full analysis of a single query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnalysis {
    /// Query as given.
    pub query: String,
    /// Score per category, bonuses included.
    pub category_scores: BTreeMap<IntentCategory, f64>,
    /// Evidence per category, in catalog order with synthetic signals last.
    pub category_signals: BTreeMap<IntentCategory, Vec<SignalMatch>>,
    /// URL or domain found in the query.
    pub detected_url: Option<String>,
    /// Structural complexity.
    pub complexity: Complexity,
    /// Recency intent.
    pub recency: Recency,
    /// Final score per provider.
    pub provider_scores: BTreeMap<Provider, f64>,
}

impl QueryAnalysis {
    /// Score for `provider`; 0.0 if absent.
    pub fn provider_score(&self, provider: Provider) -> f64 {
        self.provider_scores.get(&provider).copied().unwrap_or(0.0)
    }

    /// Evidence supporting `provider`: the signals of every category mapped
    /// to it, in category order.
    pub fn provider_signals(&self, provider: Provider) -> Vec<&SignalMatch> {
        IntentCategory::all()
            .iter()
            .filter(|c| c.provider() == provider)
            .filter_map(|c| self.category_signals.get(c))
            .flatten()
            .collect()
    }

    /// Whether any category scored above zero.
    pub fn has_signals(&self) -> bool {
        self.category_scores.values().any(|&s| s > 0.0)
    }
}

/// Analyze `query` against the shared built-in catalog.
pub fn analyze(query: &str) -> QueryAnalysis {
    analyze_with(signals::catalog(), query)
}

/// Analyze `query` against `catalog`.
pub fn analyze_with(catalog: &SignalCatalog, query: &str) -> QueryAnalysis {
    let lowered = query.to_lowercase();

    let mut category_scores = BTreeMap::new();
    let mut category_signals = BTreeMap::new();
    for &category in IntentCategory::all() {
        let (score, matches) = score_category(catalog, category, &lowered);
        category_scores.insert(category, score);
        category_signals.insert(category, matches);
    }

    let mut add = |category: IntentCategory, signal: SignalMatch| {
        *category_scores.entry(category).or_insert(0.0) += signal.weight;
        category_signals.entry(category).or_default().push(signal);
    };

    let brand = detectors::brand_bonus(catalog, &lowered);
    if brand > 0.0 {
        add(
            IntentCategory::Shopping,
            SignalMatch::synthetic("product_brand_combo", "brand + product detected", brand),
        );
    }

    let detected_url = detectors::detect_url(catalog, query);
    if let Some(url) = &detected_url {
        add(
            IntentCategory::Discovery,
            SignalMatch::synthetic("url_detected", url.as_str(), detectors::URL_BONUS),
        );
    }

    let complexity = detectors::assess_complexity(catalog, query);
    if complexity.is_complex {
        add(
            IntentCategory::Research,
            SignalMatch::synthetic(
                "query_complexity",
                format!("complex query ({} words)", complexity.word_count),
                complexity.score,
            ),
        );
    }

    let recency = detectors::detect_recency(catalog, query);

    let score = |c: IntentCategory| category_scores.get(&c).copied().unwrap_or(0.0);
    // A complex query already carries its complexity inside research; a
    // simple one gets it added here.
    let complexity_extra = if complexity.is_complex {
        0.0
    } else {
        complexity.score
    };
    let provider_scores = BTreeMap::from([
        (
            Provider::Serper,
            score(IntentCategory::Shopping)
                + score(IntentCategory::LocalNews)
                + SERPER_RECENCY_FACTOR * recency.score,
        ),
        (
            Provider::Tavily,
            score(IntentCategory::Research) + complexity_extra,
        ),
        (Provider::Exa, score(IntentCategory::Discovery)),
        (
            Provider::You,
            score(IntentCategory::Rag) + YOU_RECENCY_FACTOR * recency.score,
        ),
        (Provider::Searxng, score(IntentCategory::Privacy)),
    ]);

    tracing::trace!(query, "analyzed query");
    tracing::debug!(
        ?provider_scores,
        is_complex = complexity.is_complex,
        recency = recency.score,
        has_url = detected_url.is_some(),
        "query analysis complete"
    );

    QueryAnalysis {
        query: query.to_string(),
        category_scores,
        category_signals,
        detected_url,
        complexity,
        recency,
        provider_scores,
    }
}

fn score_category(
    catalog: &SignalCatalog,
    category: IntentCategory,
    lowered: &str,
) -> (f64, Vec<SignalMatch>) {
    let matches: Vec<SignalMatch> = catalog
        .signals(category)
        .iter()
        .filter_map(|signal| signal.first_match(lowered).map(|m| signal.evidence(m)))
        .collect();
    // fold from +0.0: an empty f64 sum is -0.0
    let score = matches.iter().fold(0.0, |acc, m| acc + m.weight);
    (score, matches)
}
