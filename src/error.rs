//! Error taxonomy for the aggregation pipeline.
//!
//! Only configuration problems escalate out of an aggregation run; per-term
//! provider failures are recovered locally into diagnostics (see
//! `pool::fetch`), and malformed records are dropped silently by the
//! normalizer.

use thiserror::Error;

/// Errors that abort an aggregation run as a whole.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// No provider credential was supplied. This is a configuration error,
    /// not a retryable runtime condition.
    #[error("no Google Books API key configured; set GOOGLE_BOOKS_API_KEY or pass --api-key")]
    MissingCredential,

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_mentions_remediation() {
        let msg = AggregateError::MissingCredential.to_string();
        assert!(msg.contains("GOOGLE_BOOKS_API_KEY"));
    }
}
