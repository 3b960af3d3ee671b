//! Google Books API client.
//!
//! One outbound HTTPS call per search term, with the credential injected at
//! construction. The client never reads environment state itself; the CLI
//! layer resolves the key and passes it in.

use crate::error::AggregateError;
use crate::models::SearchTerm;
use crate::provider::{ProviderClient, ProviderError, SearchResponse, Volume};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Provider-wide query options, fixed per client.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// BCP-47 language restriction, e.g. "en".
    pub language: String,
    /// Result ordering ("relevance" or "newest").
    pub order_by: String,
    /// Print type filter ("books" excludes magazines).
    pub print_type: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            order_by: "relevance".to_string(),
            print_type: "books".to_string(),
        }
    }
}

/// HTTP client for the Google Books volumes endpoint.
pub struct GoogleBooksClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    options: SearchOptions,
}

impl GoogleBooksClient {
    /// Creates a client with an injected credential.
    ///
    /// Fails with [`AggregateError::MissingCredential`] when the key is
    /// empty; that is surfaced to the caller before any plan is executed.
    pub fn new(
        api_key: &str,
        options: SearchOptions,
        timeout: Duration,
    ) -> Result<Self, AggregateError> {
        if api_key.trim().is_empty() {
            return Err(AggregateError::MissingCredential);
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AggregateError::ClientBuild)?;

        Ok(Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.trim().to_string(),
            options,
        })
    }

    /// Overrides the endpoint URL. Used by tests against a local stub.
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

#[async_trait]
impl ProviderClient for GoogleBooksClient {
    async fn search(
        &self,
        term: &SearchTerm,
        max_results: u32,
    ) -> Result<Vec<Volume>, ProviderError> {
        let query = term.query_string();
        debug!("Querying provider: {} (max {})", query, max_results);

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("q", query.as_str()),
                ("maxResults", &max_results.to_string()),
                ("printType", &self.options.print_type),
                ("langRestrict", &self.options.language),
                ("orderBy", &self.options.order_by),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::transport("request timed out")
                } else if e.is_connect() {
                    ProviderError::transport("cannot connect to Google Books API")
                } else {
                    // reqwest error text can embed the request URL; strip it
                    // down to the error description so the key never leaks.
                    ProviderError::transport(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::status(status.as_u16(), body));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::transport(format!("malformed response: {}", e.without_url())))?;

        Ok(search_response.items)
    }
}
