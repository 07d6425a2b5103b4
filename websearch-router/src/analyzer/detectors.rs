//! Auxiliary detectors feeding the analyzer: brand/product, URL,
//! complexity and recency.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::signals::SignalCatalog;

/// Shopping bonus when a brand token and a purchase indicator both appear.
pub const BRAND_WITH_INTENT_BONUS: f64 = 3.0;

/// Shopping bonus when only a brand token appears.
pub const BRAND_ONLY_BONUS: f64 = 1.5;

/// Discovery bonus for an explicit URL or bare domain.
pub const URL_BONUS: f64 = 5.0;

/// Complexity scores above this mark the query as complex.
pub const COMPLEXITY_THRESHOLD: f64 = 2.0;

/// Recency scores above this mark the query as recency-focused.
pub const RECENCY_THRESHOLD: f64 = 2.0;

/// Shopping bonus for brand/product mentions; 0.0 when no brand appears.
pub fn brand_bonus(catalog: &SignalCatalog, lowered: &str) -> f64 {
    let brand = catalog.brands().iter().any(|re| re.is_match(lowered));
    if !brand {
        return 0.0;
    }
    let intent = catalog
        .purchase_indicators()
        .iter()
        .any(|re| re.is_match(lowered));
    if intent {
        BRAND_WITH_INTENT_BONUS
    } else {
        BRAND_ONLY_BONUS
    }
}

/// First explicit URL, else first bare domain-like token.
pub fn detect_url(catalog: &SignalCatalog, query: &str) -> Option<String> {
    catalog
        .explicit_url()
        .and_then(|re| re.find(query))
        .or_else(|| catalog.bare_domain().and_then(|re| re.find(query)))
        .map(|m| m.as_str().to_string())
}

/// Structural complexity of a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Complexity {
    /// Whitespace-separated word count.
    pub word_count: usize,
    /// Distinct question words (what, why, how, ...).
    pub question_words: usize,
    /// Clause connective occurrences (and, but, because, ...).
    pub clause_markers: usize,
    /// `1.5 (>10 words) + 1.0 (>20 words) + 1.0 (>1 question word) + 0.5 per clause marker`.
    pub score: f64,
    /// `score > 2.0`.
    pub is_complex: bool,
}

pub fn assess_complexity(catalog: &SignalCatalog, query: &str) -> Complexity {
    let word_count = query.split_whitespace().count();

    let question_words = catalog.question_words().map_or(0, |re| {
        re.find_iter(query)
            .map(|m| m.as_str().to_lowercase())
            .collect::<BTreeSet<_>>()
            .len()
    });
    let clause_markers = catalog
        .clause_markers()
        .map_or(0, |re| re.find_iter(query).count());

    let mut score = 0.0;
    if word_count > 10 {
        score += 1.5;
    }
    if word_count > 20 {
        score += 1.0;
    }
    if question_words > 1 {
        score += 1.0;
    }
    score += 0.5 * clause_markers as f64;

    Complexity {
        word_count,
        question_words,
        clause_markers,
        score,
        is_complex: score > COMPLEXITY_THRESHOLD,
    }
}

/// Recency intent of a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recency {
    /// Sum of matched recency pattern weights.
    pub score: f64,
    /// `score > 2.0`.
    pub is_recency: bool,
}

pub fn detect_recency(catalog: &SignalCatalog, query: &str) -> Recency {
    let score: f64 = catalog
        .recency()
        .iter()
        .filter(|signal| signal.first_match(query).is_some())
        .fold(0.0, |acc, signal| acc + signal.weight());
    Recency {
        score,
        is_recency: score > RECENCY_THRESHOLD,
    }
}
