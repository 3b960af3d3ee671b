//! Rendering of an aggregation result as text or JSON.
//!
//! JSON is the machine-facing shape handed to a downstream ranker; the text
//! form is a quick human summary for terminal use.

use crate::models::AggregationResult;
use anyhow::Result;

/// Render the result as pretty-printed JSON.
pub fn render_json(result: &AggregationResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Render a human-readable text summary.
pub fn render_text(result: &AggregationResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Pool: {} candidates from {} terms\n\n",
        result.count,
        result.terms_used.len()
    ));

    output.push_str("Terms:\n");
    for report in &result.diagnostics {
        if report.succeeded {
            output.push_str(&format!(
                "  ✅ {} ({} items)\n",
                report.term,
                report.items.unwrap_or(0)
            ));
        } else {
            let status = report
                .http_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "transport".to_string());
            output.push_str(&format!("  ❌ {} [{}]\n", report.term, status));
        }
    }

    if !result.candidates.is_empty() {
        output.push_str("\nCandidates:\n");
        for candidate in &result.candidates {
            let authors = if candidate.authors.is_empty() {
                "unknown author".to_string()
            } else {
                candidate.authors.join(", ")
            };
            let year = if candidate.published_date.is_empty() {
                String::new()
            } else {
                format!(" ({})", candidate.published_date)
            };
            output.push_str(&format!(
                "  📖 {} - {}{}\n",
                candidate.title, authors, year
            ));
        }
    }

    output
}
