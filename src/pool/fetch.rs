//! Fetch executor: one provider call per planned term, failure-isolated,
//! under an early-stop budget.
//!
//! A term's failure never aborts the fan-out; it becomes a failed
//! [`FetchOutcome`] and the remaining terms still run. Once the running raw
//! item total reaches the budget, no further calls are issued.

use crate::models::{QueryPlan, SearchTerm};
use crate::provider::{ProviderClient, Volume};
use futures::future::join_all;
use tracing::{debug, warn};

/// Cap on captured error detail, so a huge provider body cannot bloat
/// diagnostics.
const MAX_ERROR_DETAIL_LEN: usize = 500;

/// Provider-side hard cap on results per call.
const PROVIDER_MAX_RESULTS: u32 = 40;

/// Floor for the per-term result count; a large plan still gets a useful
/// sample per term.
const PER_TERM_FLOOR: u32 = 20;

/// Budget limits for one fan-out.
#[derive(Debug, Clone, Copy)]
pub struct FetchBudget {
    /// Stop issuing calls once this many raw items have been seen.
    pub max_items: usize,
    /// Per-term result cap; clamped to the provider maximum.
    pub max_results_per_term: u32,
}

impl FetchBudget {
    /// Derives a budget for a plan of `plan_len` terms: the per-term cap is
    /// the item budget split across terms, clamped to [20, 40].
    pub fn for_plan(max_items: usize, plan_len: usize) -> Self {
        let split = u32::try_from(max_items / plan_len.max(1)).unwrap_or(u32::MAX);
        Self {
            max_items,
            max_results_per_term: split.clamp(PER_TERM_FLOOR, PROVIDER_MAX_RESULTS),
        }
    }
}

/// How the fan-out issues its calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// One call at a time; gentlest on provider rate limits.
    Sequential,
    /// Fixed-size concurrent batches. The budget check runs between
    /// batches, so overshoot is bounded by one in-flight batch.
    Parallel { batch: usize },
}

/// The result of one attempted term.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The term that was attempted.
    pub term: SearchTerm,
    /// Whether the provider call succeeded.
    pub succeeded: bool,
    /// HTTP status captured from a failed response, when available.
    pub http_status: Option<u16>,
    /// Raw records returned for this term.
    pub items: Vec<Volume>,
    /// Truncated error detail for failed calls.
    pub error_detail: Option<String>,
}

/// Executes the plan in order, honoring the early-stop budget.
///
/// Terms skipped by the early stop are simply not attempted; they produce
/// no outcome at all. No term is retried.
pub async fn fetch_plan(
    client: &dyn ProviderClient,
    plan: &QueryPlan,
    budget: &FetchBudget,
    strategy: FetchStrategy,
) -> Vec<FetchOutcome> {
    match strategy {
        FetchStrategy::Sequential => fetch_sequential(client, plan, budget).await,
        FetchStrategy::Parallel { batch } => {
            fetch_batched(client, plan, budget, batch.max(1)).await
        }
    }
}

async fn fetch_sequential(
    client: &dyn ProviderClient,
    plan: &QueryPlan,
    budget: &FetchBudget,
) -> Vec<FetchOutcome> {
    let mut outcomes = Vec::with_capacity(plan.len());
    let mut total_items = 0usize;

    for term in plan {
        if total_items >= budget.max_items {
            debug!(
                "Item budget reached ({} items); skipping remaining terms",
                total_items
            );
            break;
        }

        let outcome = fetch_one(client, term, budget.max_results_per_term).await;
        total_items += outcome.items.len();
        outcomes.push(outcome);
    }

    outcomes
}

async fn fetch_batched(
    client: &dyn ProviderClient,
    plan: &QueryPlan,
    budget: &FetchBudget,
    batch: usize,
) -> Vec<FetchOutcome> {
    let mut outcomes = Vec::with_capacity(plan.len());
    let mut total_items = 0usize;

    for chunk in plan.chunks(batch) {
        if total_items >= budget.max_items {
            break;
        }

        // join_all preserves input order, so outcomes stay in plan order
        // regardless of which call completes first.
        let batch_outcomes = join_all(
            chunk
                .iter()
                .map(|term| fetch_one(client, term, budget.max_results_per_term)),
        )
        .await;

        for outcome in batch_outcomes {
            total_items += outcome.items.len();
            outcomes.push(outcome);
        }
    }

    outcomes
}

async fn fetch_one(client: &dyn ProviderClient, term: &SearchTerm, max_results: u32) -> FetchOutcome {
    match client.search(term, max_results).await {
        Ok(items) => {
            debug!("Term {} returned {} items", term, items.len());
            FetchOutcome {
                term: term.clone(),
                succeeded: true,
                http_status: None,
                items,
                error_detail: None,
            }
        }
        Err(e) => {
            warn!("Term {} failed: {}", term, e);
            FetchOutcome {
                term: term.clone(),
                succeeded: false,
                http_status: e.status,
                items: Vec::new(),
                error_detail: Some(truncate_detail(&e.message)),
            }
        }
    }
}

/// Truncates error detail to a bounded size on a char boundary.
fn truncate_detail(detail: &str) -> String {
    if detail.chars().count() <= MAX_ERROR_DETAIL_LEN {
        detail.to_string()
    } else {
        detail.chars().take(MAX_ERROR_DETAIL_LEN).collect()
    }
}
