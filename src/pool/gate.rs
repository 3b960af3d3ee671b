//! Quality gate: the configurable acceptance predicate for candidates.
//!
//! Rules compose by logical AND inside a named profile; the caller picks the
//! profile. Rejected candidates are non-matches, not errors, and are dropped
//! silently.

use crate::models::Candidate;
use std::fmt;
use std::str::FromStr;

/// Obvious-junk markers from the historical filter: study guides, workbooks,
/// unofficial companions and the like.
const DEFAULT_BANNED_TERMS: [&str; 11] = [
    "summary",
    "study guide",
    "workbook",
    "analysis",
    "journal",
    "notebook",
    "companion",
    "collection set",
    "boxed set",
    "guide to",
    "unofficial",
];

/// A single acceptance rule.
#[derive(Debug, Clone, PartialEq)]
pub enum GateRule {
    /// Reject candidates with no author.
    RequireAuthor,
    /// Reject candidates whose page count is below `n`.
    ///
    /// A missing page count also fails: a record that does not report one
    /// gives no evidence it clears the bar.
    RequireMinPageCount(u32),
    /// Reject candidates without a cover image.
    RequireCover,
    /// Reject candidates whose description is shorter than `min_len` chars.
    RequireDescription { min_len: usize },
    /// Reject candidates whose title, subtitle, or description contains any
    /// of these terms (case-insensitive substring match).
    BannedTerms(Vec<String>),
}

impl GateRule {
    fn accepts(&self, candidate: &Candidate) -> bool {
        match self {
            GateRule::RequireAuthor => !candidate.authors.is_empty(),
            GateRule::RequireMinPageCount(n) => {
                matches!(candidate.page_count, Some(count) if count >= *n)
            }
            GateRule::RequireCover => candidate.has_cover,
            GateRule::RequireDescription { min_len } => {
                candidate.description.chars().count() >= *min_len
            }
            GateRule::BannedTerms(words) => {
                let blob = format!(
                    "{} {} {}",
                    candidate.title, candidate.subtitle, candidate.description
                )
                .to_lowercase();
                !words.iter().any(|w| blob.contains(&w.to_lowercase()))
            }
        }
    }
}

/// A named, swappable rule set.
#[derive(Debug, Clone)]
pub struct QualityProfile {
    name: String,
    rules: Vec<GateRule>,
}

impl QualityProfile {
    /// Builds a profile from an explicit rule list.
    pub fn new(name: &str, rules: Vec<GateRule>) -> Self {
        Self {
            name: name.to_string(),
            rules,
        }
    }

    /// Full historical filter: author, 150+ pages, cover, banned terms.
    pub fn strict() -> Self {
        Self::new(
            "strict",
            vec![
                GateRule::RequireAuthor,
                GateRule::RequireMinPageCount(150),
                GateRule::RequireCover,
                GateRule::BannedTerms(
                    DEFAULT_BANNED_TERMS.iter().map(|s| s.to_string()).collect(),
                ),
            ],
        )
    }

    /// Author-only filter, for the widest usable pool.
    pub fn lenient() -> Self {
        Self::new("lenient", vec![GateRule::RequireAuthor])
    }

    /// For call sites that surface the description directly.
    pub fn description_required() -> Self {
        Self::new(
            "description-required",
            vec![
                GateRule::RequireAuthor,
                GateRule::RequireCover,
                GateRule::RequireDescription { min_len: 50 },
            ],
        )
    }

    /// True iff the candidate passes every active rule.
    pub fn accepts(&self, candidate: &Candidate) -> bool {
        self.rules.iter().all(|rule| rule.accepts(candidate))
    }

    /// The profile's name, for logging and diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QualityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for QualityProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::strict()),
            "lenient" => Ok(Self::lenient()),
            "description-required" | "description_required" => Ok(Self::description_required()),
            other => Err(format!(
                "unknown quality profile '{other}' (expected strict, lenient, or description-required)"
            )),
        }
    }
}
