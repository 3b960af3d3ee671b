//! Aggregator: the top of the pipeline.
//!
//! Plans the terms, fans out the fetch, then folds every raw record in term
//! order through normalize → dedupe → gate. Partial provider failure
//! degrades into a smaller pool plus diagnostics; the run as a whole only
//! fails when the provider client could not be constructed at all.

use crate::models::{AggregationResult, TermReport, UserHint};
use crate::planner::{self, PlannerConfig};
use crate::pool::fetch::{fetch_plan, FetchBudget, FetchOutcome, FetchStrategy};
use crate::pool::gate::QualityProfile;
use crate::pool::normalize::normalize;
use crate::provider::ProviderClient;
use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, info};

/// One configured aggregation pipeline.
///
/// Owns no mutable state between runs; every run builds its own plan,
/// accumulator, and diagnostics.
pub struct Aggregator<'a> {
    client: &'a dyn ProviderClient,
    planner_config: PlannerConfig,
    profile: QualityProfile,
    max_items: usize,
    strategy: FetchStrategy,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        client: &'a dyn ProviderClient,
        planner_config: PlannerConfig,
        profile: QualityProfile,
        max_items: usize,
        strategy: FetchStrategy,
    ) -> Self {
        Self {
            client,
            planner_config,
            profile,
            max_items,
            strategy,
        }
    }

    /// Runs one aggregation: plan, fetch, normalize, dedupe, gate.
    pub async fn run(&self, hint: &UserHint) -> AggregationResult {
        let plan = planner::plan(hint, &self.planner_config);
        info!(
            "Planned {} terms under profile '{}'",
            plan.len(),
            self.profile.name()
        );

        let budget = FetchBudget::for_plan(self.max_items, plan.len());
        let outcomes = fetch_plan(self.client, &plan, &budget, self.strategy).await;

        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates = Vec::new();

        // Term order here is plan order, which makes first-seen-wins honor
        // the planner's priorities.
        for outcome in &outcomes {
            for raw in &outcome.items {
                let Some(candidate) = normalize(raw) else {
                    continue;
                };
                if !seen.insert(candidate.id.clone()) {
                    continue;
                }
                if self.profile.accepts(&candidate) {
                    candidates.push(candidate);
                }
            }
        }

        // The candidate cap applies after dedup, so cross-term duplicates
        // never eat into the pool size.
        candidates.truncate(self.max_items);

        debug!(
            "Aggregated {} candidates from {} attempted terms",
            candidates.len(),
            outcomes.len()
        );

        AggregationResult {
            terms_used: plan.iter().map(|t| t.query_string()).collect(),
            count: candidates.len(),
            candidates,
            diagnostics: outcomes.iter().map(to_term_report).collect(),
            fetched_at: Utc::now(),
        }
    }
}

/// Maps a fetch outcome to its redacted diagnostics entry.
fn to_term_report(outcome: &FetchOutcome) -> TermReport {
    if outcome.succeeded {
        TermReport {
            term: outcome.term.query_string(),
            succeeded: true,
            items: Some(outcome.items.len()),
            http_status: None,
            error: None,
        }
    } else {
        TermReport {
            term: outcome.term.query_string(),
            succeeded: false,
            items: None,
            http_status: outcome.http_status,
            error: outcome.error_detail.as_deref().map(mask_credentials),
        }
    }
}

/// Masks `key=<value>` credentials anywhere in captured text.
///
/// Provider error bodies can echo the request URL, key included; nothing
/// may leave the aggregator with a live credential in it.
fn mask_credentials(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find("key=") {
        let value_start = pos + "key=".len();
        out.push_str(&rest[..value_start]);
        out.push_str("REDACTED");

        let tail = &rest[value_start..];
        let value_end = tail
            .find(|c: char| c == '&' || c == '"' || c == '\'' || c.is_whitespace())
            .unwrap_or(tail.len());
        rest = &tail[value_end..];
    }

    out.push_str(rest);
    out
}
