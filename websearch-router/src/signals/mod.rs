//! Signal catalog: weighted intent patterns grouped by category.
//!
//! The static tables in [`catalog`] are compiled once per process into a
//! [`SignalCatalog`] and shared read-only by every analysis. Nothing
//! mutates the registry after construction, so no locking is needed.
//!
//! Matching is case-insensitive regex search over the lower-cased query.
//! English and German variants sit side by side in the same category.

pub mod catalog;

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::Provider;

/// Intent categories scored by the analyzer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    /// Prices, purchase intent, deals, product comparison.
    Shopping,
    /// Explanations, analysis, learning, academic depth.
    Research,
    /// Similar companies, alternatives, funding, papers, URLs.
    Discovery,
    /// Local places, weather, news and recency.
    LocalNews,
    /// LLM context, summaries, real-time status.
    Rag,
    /// Privacy, meta-search, zero-cost search.
    Privacy,
}

impl IntentCategory {
    /// Provider this category's score feeds into.
    pub fn provider(&self) -> Provider {
        match self {
            Self::Shopping | Self::LocalNews => Provider::Serper,
            Self::Research => Provider::Tavily,
            Self::Discovery => Provider::Exa,
            Self::Rag => Provider::You,
            Self::Privacy => Provider::Searxng,
        }
    }

    /// Snake-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Shopping => "shopping",
            Self::Research => "research",
            Self::Discovery => "discovery",
            Self::LocalNews => "local_news",
            Self::Rag => "rag",
            Self::Privacy => "privacy",
        }
    }

    /// All categories in scoring order.
    pub fn all() -> &'static [IntentCategory] {
        &[
            Self::Shopping,
            Self::Research,
            Self::Discovery,
            Self::LocalNews,
            Self::Rag,
            Self::Privacy,
        ]
    }
}

/// A static (pattern, weight) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPattern {
    /// Regex source, matched case-insensitively.
    pub pattern: &'static str,
    /// Score contributed when the pattern matches at least once.
    pub weight: f64,
    /// A match is ignored when the text right after it matches this.
    pub not_followed_by: Option<&'static str>,
}

impl SignalPattern {
    /// Plain weighted pattern.
    pub const fn new(pattern: &'static str, weight: f64) -> Self {
        Self {
            pattern,
            weight,
            not_followed_by: None,
        }
    }

    /// Pattern that must not be immediately followed by `guard`.
    pub const fn guarded(pattern: &'static str, weight: f64, guard: &'static str) -> Self {
        Self {
            pattern,
            weight,
            not_followed_by: Some(guard),
        }
    }
}

/// One piece of evidence: a pattern that matched, and what it matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMatch {
    /// Pattern source, or a synthetic signal name such as `url_detected`.
    pub pattern: String,
    /// First matched text (or a description for synthetic signals).
    pub matched: String,
    /// Weight added to the category score.
    pub weight: f64,
}

impl SignalMatch {
    /// Evidence for a bonus that does not come from a catalog pattern.
    pub fn synthetic(name: &str, matched: impl Into<String>, weight: f64) -> Self {
        Self {
            pattern: name.to_string(),
            matched: matched.into(),
            weight,
        }
    }
}

/// A compiled [`SignalPattern`].
#[derive(Debug, Clone)]
pub struct CompiledSignal {
    source: SignalPattern,
    regex: Regex,
    guard: Option<Regex>,
}

impl CompiledSignal {
    /// Compile `source` case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns the regex error for an invalid pattern or guard.
    pub fn compile(source: SignalPattern) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("(?i){}", source.pattern))?;
        let guard = source
            .not_followed_by
            .map(|g| Regex::new(&format!("(?i)^(?:{g})")))
            .transpose()?;
        Ok(Self {
            source,
            regex,
            guard,
        })
    }

    /// Regex source.
    pub fn pattern(&self) -> &'static str {
        self.source.pattern
    }

    /// Weight.
    pub fn weight(&self) -> f64 {
        self.source.weight
    }

    /// First match in `text` that is not rejected by the guard.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .find_iter(text)
            .find(|m| {
                self.guard
                    .as_ref()
                    .is_none_or(|g| !g.is_match(&text[m.end()..]))
            })
            .map(|m| m.as_str())
    }

    /// Evidence record for a match of this signal.
    pub fn evidence(&self, matched: &str) -> SignalMatch {
        SignalMatch {
            pattern: self.pattern().to_string(),
            matched: matched.to_string(),
            weight: self.weight(),
        }
    }
}

/// Immutable registry of compiled signal tables and detector patterns.
#[derive(Debug)]
pub struct SignalCatalog {
    categories: Vec<(IntentCategory, Vec<CompiledSignal>)>,
    recency: Vec<CompiledSignal>,
    brands: Vec<Regex>,
    purchase_indicators: Vec<Regex>,
    explicit_url: Option<Regex>,
    bare_domain: Option<Regex>,
    question_words: Option<Regex>,
    clause_markers: Option<Regex>,
}

impl SignalCatalog {
    /// Compile the built-in tables.
    ///
    /// A pattern that fails to compile is logged and skipped; the built-in
    /// tables are covered by a test that requires every entry to compile.
    pub fn builtin() -> Self {
        let categories = IntentCategory::all()
            .iter()
            .map(|&category| (category, compile_table(catalog::table(category))))
            .collect();

        Self {
            categories,
            recency: compile_table(catalog::RECENCY),
            brands: compile_plain(catalog::BRANDS),
            purchase_indicators: compile_plain(catalog::PURCHASE_INDICATORS),
            explicit_url: plain_regex(catalog::EXPLICIT_URL),
            bare_domain: plain_regex(catalog::BARE_DOMAIN),
            question_words: plain_regex(catalog::QUESTION_WORDS),
            clause_markers: plain_regex(catalog::CLAUSE_MARKERS),
        }
    }

    /// Compiled signals for `category`, in catalog order.
    pub fn signals(&self, category: IntentCategory) -> &[CompiledSignal] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(&[], |(_, signals)| signals.as_slice())
    }

    /// `(pattern, weight)` pairs for `category`, in catalog order.
    pub fn patterns(&self, category: IntentCategory) -> Vec<(&'static str, f64)> {
        self.signals(category)
            .iter()
            .map(|s| (s.pattern(), s.weight()))
            .collect()
    }

    /// Weighted recency patterns.
    pub fn recency(&self) -> &[CompiledSignal] {
        &self.recency
    }

    /// Brand and product-category token patterns.
    pub fn brands(&self) -> &[Regex] {
        &self.brands
    }

    /// Purchase-intent indicators: buy/price/spec keywords, tiers, sizes.
    pub fn purchase_indicators(&self) -> &[Regex] {
        &self.purchase_indicators
    }

    /// Explicit `http(s)://` URL.
    pub fn explicit_url(&self) -> Option<&Regex> {
        self.explicit_url.as_ref()
    }

    /// Bare domain-like token such as `notion.so` or `linear.app`.
    pub fn bare_domain(&self) -> Option<&Regex> {
        self.bare_domain.as_ref()
    }

    /// Question words (what, why, how, ...).
    pub fn question_words(&self) -> Option<&Regex> {
        self.question_words.as_ref()
    }

    /// Clause connectives (and, but, because, ...).
    pub fn clause_markers(&self) -> Option<&Regex> {
        self.clause_markers.as_ref()
    }
}

/// Process-wide catalog, compiled on first use.
static CATALOG: OnceLock<SignalCatalog> = OnceLock::new();

/// Access the shared built-in catalog.
pub fn catalog() -> &'static SignalCatalog {
    CATALOG.get_or_init(SignalCatalog::builtin)
}

fn compile_table(table: &[SignalPattern]) -> Vec<CompiledSignal> {
    table
        .iter()
        .filter_map(|&source| match CompiledSignal::compile(source) {
            Ok(signal) => Some(signal),
            Err(e) => {
                tracing::error!(pattern = source.pattern, error = %e, "invalid signal pattern skipped");
                None
            }
        })
        .collect()
}

fn compile_plain(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(&format!("(?i){p}")) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(pattern = p, error = %e, "invalid detector pattern skipped");
                None
            }
        })
        .collect()
}

fn plain_regex(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){pattern}"))
        .inspect_err(|e| {
            tracing::error!(pattern, error = %e, "invalid detector pattern, detector disabled");
        })
        .ok()
}
