//! Data models for the candidate aggregator.
//!
//! This module contains the request-scoped value objects that flow through
//! the pipeline: user hints, planned search terms, normalized candidates,
//! and the final aggregation result. None of these outlive the request
//! that created them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The loose set of hints a user provides.
///
/// Any field may be empty; the caller is responsible for rejecting a
/// request where all three are empty before invoking the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserHint {
    /// Free-text seed, e.g. a title fragment or topic ("Gone Girl").
    #[serde(default)]
    pub seed: String,
    /// Genre hint, e.g. "thriller", "romantasy", "nonfiction".
    #[serde(default)]
    pub genre: String,
    /// Mood hint, e.g. "cozy", "dark", "fast-paced".
    #[serde(default)]
    pub mood: String,
}

impl UserHint {
    /// Creates a hint from raw user input, trimming whitespace.
    pub fn new(seed: &str, genre: &str, mood: &str) -> Self {
        Self {
            seed: seed.trim().to_string(),
            genre: genre.trim().to_string(),
            mood: mood.trim().to_string(),
        }
    }

    /// Returns true if every field is empty.
    #[allow(dead_code)] // Utility for embedding callers
    pub fn is_empty(&self) -> bool {
        self.seed.is_empty() && self.genre.is_empty() && self.mood.is_empty()
    }
}

/// A single planned search term.
///
/// Terms are case-insensitively unique within a plan, and the plan order
/// matters: earlier terms are consumed first under the early-stop budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm {
    /// The query text as the planner produced it.
    pub text: String,
    /// Whether the term should be sent as an exact-title match.
    #[serde(default)]
    pub exact_title: bool,
}

impl SearchTerm {
    /// A plain free-text term.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exact_title: false,
        }
    }

    /// A term carrying the provider's title-precision modifier.
    pub fn exact_title(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exact_title: true,
        }
    }

    /// The provider-facing query string.
    pub fn query_string(&self) -> String {
        if self.exact_title {
            format!("intitle:\"{}\"", self.text)
        } else {
            self.text.clone()
        }
    }

    /// Key used for case-insensitive deduplication within a plan.
    pub fn dedup_key(&self) -> String {
        self.query_string().to_lowercase()
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_string())
    }
}

/// Ordered, length-bounded list of search terms for one request.
pub type QueryPlan = Vec<SearchTerm>;

/// A normalized, deduplicated book record eligible for downstream ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable provider-assigned volume id. Always non-empty.
    pub id: String,
    /// Title, empty string when the provider omits it.
    pub title: String,
    /// Subtitle, empty string when absent.
    #[serde(default)]
    pub subtitle: String,
    /// Authors in provider order.
    pub authors: Vec<String>,
    /// Category labels.
    pub categories: BTreeSet<String>,
    /// Description text, possibly empty.
    pub description: String,
    /// Publication date as the provider reports it (often just a year).
    pub published_date: String,
    /// Best available cover image URL, empty when none.
    pub thumbnail_url: String,
    /// Provider info page link.
    pub info_link: String,
    /// Page count when the provider reports a usable number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    /// Average user rating, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Number of ratings behind the average, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<u64>,
    /// True iff any cover image field was non-empty.
    pub has_cover: bool,
}

/// Redacted per-term diagnostics entry in the final result.
///
/// Successful terms report an item count; failed terms report the captured
/// status and a truncated, credential-masked error detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermReport {
    /// The provider-facing query string that was attempted.
    pub term: String,
    /// Whether the provider call succeeded.
    pub succeeded: bool,
    /// Raw item count for successful calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
    /// HTTP status for failed calls, when one was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Masked, truncated error detail for failed calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The assembled output of one aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    /// The provider-facing terms the plan produced, in priority order.
    pub terms_used: Vec<String>,
    /// Number of candidates in the pool.
    pub count: usize,
    /// Deduplicated, gate-passed candidates in first-seen order.
    pub candidates: Vec<Candidate>,
    /// One entry per attempted term.
    pub diagnostics: Vec<TermReport>,
    /// When the run completed.
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_trims_input() {
        let hint = UserHint::new("  Gone Girl  ", "thriller", " ");
        assert_eq!(hint.seed, "Gone Girl");
        assert_eq!(hint.genre, "thriller");
        assert!(hint.mood.is_empty());
    }

    #[test]
    fn test_hint_is_empty() {
        assert!(UserHint::default().is_empty());
        assert!(!UserHint::new("", "fantasy", "").is_empty());
    }

    #[test]
    fn test_term_query_string() {
        assert_eq!(
            SearchTerm::plain("cozy fantasy").query_string(),
            "cozy fantasy"
        );
        assert_eq!(
            SearchTerm::exact_title("Gone Girl").query_string(),
            "intitle:\"Gone Girl\""
        );
    }

    #[test]
    fn test_term_dedup_key_is_case_insensitive() {
        assert_eq!(
            SearchTerm::plain("Thriller").dedup_key(),
            SearchTerm::plain("thriller").dedup_key()
        );
        // The precision modifier is part of the identity.
        assert_ne!(
            SearchTerm::plain("gone girl").dedup_key(),
            SearchTerm::exact_title("gone girl").dedup_key()
        );
    }
}
