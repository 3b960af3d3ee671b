//! Query planner: expands user hints into an ordered, bounded term list.
//!
//! A single provider query under-covers the space of relevant books, so the
//! planner emits several phrasings. Singleton terms come first so that a
//! partial-budget early stop still samples each hint axis independently
//! before the narrower combined terms.

use crate::models::{QueryPlan, SearchTerm, UserHint};
use std::collections::HashSet;

/// Generic discovery terms appended when the hint is too vague to anchor
/// a useful pool on its own.
const DISCOVERY_FALLBACKS: [&str; 4] = [
    "bestselling books",
    "popular books",
    "award winning books",
    "highly rated books",
];

/// Planner settings.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum number of terms in a plan.
    pub max_terms: usize,
    /// Signals shorter than this trigger the vagueness widening rule.
    pub min_signal_len: usize,
    /// Send the seed as an exact-title match instead of free text.
    pub seed_as_title: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_terms: 8,
            min_signal_len: 4,
            seed_as_title: false,
        }
    }
}

/// Expands a hint into an ordered, deduplicated query plan.
///
/// Total: never fails and never returns an empty plan. An empty hint yields
/// the single generic fallback term.
pub fn plan(hint: &UserHint, config: &PlannerConfig) -> QueryPlan {
    let seed = hint.seed.trim();
    let genre = hint.genre.trim();
    let mood = hint.mood.trim();

    let mut terms: Vec<SearchTerm> = Vec::new();

    // Singletons first: each axis gets sampled even under a partial budget.
    if !seed.is_empty() {
        if config.seed_as_title {
            terms.push(SearchTerm::exact_title(seed));
        } else {
            terms.push(SearchTerm::plain(seed));
        }
    }
    if !genre.is_empty() {
        terms.push(SearchTerm::plain(genre));
    }
    if !mood.is_empty() {
        terms.push(SearchTerm::plain(mood));
    }

    // Combined terms narrow the pool toward the intersection of hints.
    if !genre.is_empty() && !mood.is_empty() {
        terms.push(SearchTerm::plain(format!("{genre} {mood}")));
    }
    if !genre.is_empty() && !seed.is_empty() {
        terms.push(SearchTerm::plain(format!("{genre} {seed}")));
    }
    if !mood.is_empty() && !seed.is_empty() {
        terms.push(SearchTerm::plain(format!("{mood} {seed}")));
    }
    if !genre.is_empty() && !mood.is_empty() && !seed.is_empty() {
        terms.push(SearchTerm::plain(format!("{genre} {mood} {seed}")));
    }

    if is_vague(seed, genre, mood, config.min_signal_len) {
        for fallback in DISCOVERY_FALLBACKS {
            terms.push(SearchTerm::plain(fallback));
        }
        if !genre.is_empty() {
            terms.push(SearchTerm::plain(format!("{genre} bestsellers")));
        }
    } else if !genre.is_empty() {
        // Gentle wideners so a well-specified hint is not too narrow.
        terms.push(SearchTerm::plain(format!("{genre} bestsellers")));
        terms.push(SearchTerm::plain(format!("{genre} new releases")));
    }

    if terms.is_empty() {
        terms.push(SearchTerm::plain(DISCOVERY_FALLBACKS[0]));
    }

    dedup_case_insensitive(&mut terms);
    terms.truncate(config.max_terms);
    terms
}

/// True when the only signal present is too short to anchor a search.
fn is_vague(seed: &str, genre: &str, mood: &str, min_len: usize) -> bool {
    let fields = [seed, genre, mood];
    let non_empty: Vec<&str> = fields.iter().copied().filter(|f| !f.is_empty()).collect();
    match non_empty.as_slice() {
        [only] => only.chars().count() < min_len,
        _ => false,
    }
}

/// Removes case-insensitive duplicates, keeping the first occurrence.
fn dedup_case_insensitive(terms: &mut Vec<SearchTerm>) {
    let mut seen: HashSet<String> = HashSet::new();
    terms.retain(|term| seen.insert(term.dedup_key()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(plan: &QueryPlan) -> Vec<String> {
        plan.iter().map(|t| t.query_string()).collect()
    }

    #[test]
    fn test_empty_hint_yields_generic_fallback() {
        let plan = plan(&UserHint::default(), &PlannerConfig::default());
        assert_eq!(texts(&plan), vec!["bestselling books"]);
    }

    #[test]
    fn test_singletons_come_before_combinations() {
        let hint = UserHint::new("dragons", "fantasy", "cozy");
        let plan = plan(&hint, &PlannerConfig::default());
        let terms = texts(&plan);

        assert_eq!(&terms[..3], &["dragons", "fantasy", "cozy"]);
        assert_eq!(
            &terms[3..7],
            &[
                "fantasy cozy",
                "fantasy dragons",
                "cozy dragons",
                "fantasy cozy dragons"
            ]
        );
    }

    #[test]
    fn test_plan_is_bounded() {
        let hint = UserHint::new("dragons", "fantasy", "cozy");
        let config = PlannerConfig::default();
        let plan = plan(&hint, &config);
        assert!(plan.len() <= config.max_terms);

        let short = PlannerConfig {
            max_terms: 3,
            ..PlannerConfig::default()
        };
        let plan = super::plan(&hint, &short);
        assert_eq!(plan.len(), 3);
        // Truncation keeps the highest-priority (singleton) terms.
        assert_eq!(texts(&plan), vec!["dragons", "fantasy", "cozy"]);
    }

    #[test]
    fn test_no_case_insensitive_duplicates() {
        let hint = UserHint::new("Thriller", "thriller", "");
        let plan = plan(&hint, &PlannerConfig::default());
        let mut keys: Vec<String> = plan.iter().map(|t| t.dedup_key()).collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
        // "thriller" survives only once, as the first occurrence.
        assert_eq!(texts(&plan)[0], "Thriller");
    }

    #[test]
    fn test_vague_short_seed_widens_with_discovery_terms() {
        let hint = UserHint::new("dr", "", "");
        let plan = plan(&hint, &PlannerConfig::default());
        let terms = texts(&plan);

        assert_eq!(terms[0], "dr");
        for fallback in DISCOVERY_FALLBACKS {
            assert!(terms.contains(&fallback.to_string()), "missing {fallback}");
        }
    }

    #[test]
    fn test_vague_rule_skipped_when_second_field_present() {
        let hint = UserHint::new("dr", "horror", "");
        let plan = plan(&hint, &PlannerConfig::default());
        let terms = texts(&plan);

        assert!(!terms.contains(&"popular books".to_string()));
        assert!(terms.contains(&"horror bestsellers".to_string()));
        assert!(terms.contains(&"horror new releases".to_string()));
    }

    #[test]
    fn test_genre_wideners_appended_when_not_vague() {
        let hint = UserHint::new("", "romantasy", "");
        let plan = plan(&hint, &PlannerConfig::default());
        let terms = texts(&plan);

        assert_eq!(terms[0], "romantasy");
        assert!(terms.contains(&"romantasy bestsellers".to_string()));
        assert!(terms.contains(&"romantasy new releases".to_string()));
    }

    #[test]
    fn test_mood_only_hint() {
        let hint = UserHint::new("", "", "cozy");
        let plan = plan(&hint, &PlannerConfig::default());
        let terms = texts(&plan);

        assert_eq!(terms[0], "cozy");
        // "cozy" is 4 chars, not vague; no genre, so no wideners either.
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn test_seed_as_title_mode() {
        let hint = UserHint::new("Gone Girl", "thriller", "");
        let config = PlannerConfig {
            seed_as_title: true,
            ..PlannerConfig::default()
        };
        let plan = plan(&hint, &config);
        let terms = texts(&plan);

        assert_eq!(terms[0], "intitle:\"Gone Girl\"");
        assert!(terms.contains(&"thriller".to_string()));
        assert!(terms.contains(&"thriller Gone Girl".to_string()));
    }

    #[test]
    fn test_scenario_seed_and_genre() {
        // hint {seed: "Gone Girl", genre: "thriller"} must produce at least
        // the seed-derived term, the genre term, and the combined term.
        let hint = UserHint::new("Gone Girl", "thriller", "");
        let plan = plan(&hint, &PlannerConfig::default());
        let terms = texts(&plan);

        assert_eq!(terms[0], "Gone Girl");
        assert!(terms.contains(&"thriller".to_string()));
        assert!(terms.contains(&"thriller Gone Girl".to_string()));
    }

    #[test]
    fn test_plan_never_empty_for_any_hint() {
        let hints = [
            UserHint::default(),
            UserHint::new("x", "", ""),
            UserHint::new("", "y", ""),
            UserHint::new("", "", "z"),
            UserHint::new("a", "b", "c"),
        ];
        for hint in &hints {
            assert!(!plan(hint, &PlannerConfig::default()).is_empty());
        }
    }
}
