//! Provider boundary: the fetch contract and the raw record shapes.
//!
//! The pipeline talks to the bibliographic search provider only through the
//! [`ProviderClient`] trait, so tests can stub it out and the executor never
//! learns provider specifics.

pub mod google;

pub use google::GoogleBooksClient;

use crate::models::SearchTerm;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// A failed provider call for one term.
///
/// Recovered locally by the fetch executor; never aborts the run.
#[derive(Debug, Clone, Error)]
#[error("provider call failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
pub struct ProviderError {
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    /// Captured error detail (response body or transport error text).
    pub message: String,
}

impl ProviderError {
    /// A transport-level failure (no HTTP status available).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// A non-success HTTP response.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: body.into(),
        }
    }
}

/// The sole network boundary of the pipeline.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Issues one search call for `term`, returning at most `max_results`
    /// raw records.
    async fn search(&self, term: &SearchTerm, max_results: u32) -> Result<Vec<Volume>, ProviderError>;
}

/// Top-level search response from the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
}

/// One raw volume record, passed through unexamined except by the normalizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Volume {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "volumeInfo")]
    pub volume_info: VolumeInfo,
}

/// The provider's per-volume metadata block. Everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub authors: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub description: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<i64>,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<u64>,
    pub image_links: Option<ImageLinks>,
    pub info_link: Option<String>,
}

/// Cover image variants, in no particular order on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::status(403, "quota exceeded");
        assert_eq!(err.to_string(), "provider call failed (403): quota exceeded");

        let err = ProviderError::transport("connection refused");
        assert_eq!(err.to_string(), "provider call failed: connection refused");
    }

    #[test]
    fn test_volume_deserializes_sparse_record() {
        let json = r#"{"id": "abc123", "volumeInfo": {"title": "Gone Girl"}}"#;
        let volume: Volume = serde_json::from_str(json).unwrap();
        assert_eq!(volume.id, "abc123");
        assert_eq!(volume.volume_info.title.as_deref(), Some("Gone Girl"));
        assert!(volume.volume_info.authors.is_none());
        assert!(volume.volume_info.image_links.is_none());
    }

    #[test]
    fn test_volume_deserializes_full_record() {
        let json = r#"{
            "id": "xyz",
            "volumeInfo": {
                "title": "The Hobbit",
                "subtitle": "There and Back Again",
                "authors": ["J. R. R. Tolkien"],
                "categories": ["Fiction"],
                "description": "A hobbit leaves home.",
                "publishedDate": "1937",
                "pageCount": 310,
                "averageRating": 4.5,
                "ratingsCount": 12345,
                "imageLinks": {"thumbnail": "https://img/t.jpg", "smallThumbnail": "https://img/s.jpg"},
                "infoLink": "https://books/xyz"
            }
        }"#;
        let volume: Volume = serde_json::from_str(json).unwrap();
        let info = &volume.volume_info;
        assert_eq!(info.page_count, Some(310));
        assert_eq!(info.ratings_count, Some(12345));
        assert_eq!(
            info.image_links.as_ref().unwrap().thumbnail.as_deref(),
            Some("https://img/t.jpg")
        );
    }

    #[test]
    fn test_search_response_defaults_to_empty_items() {
        // Google omits "items" entirely on zero-hit queries.
        let response: SearchResponse = serde_json::from_str(r#"{"totalItems": 0}"#).unwrap();
        assert!(response.items.is_empty());
    }
}
