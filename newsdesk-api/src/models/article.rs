//! Article and ingestion models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored article row. The url is the dedup key: unique across all
/// articles, a second ingestion of the same url is a no-op.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_date: Option<DateTime<Utc>>,
    pub publication_name: String,
    pub author: Option<String>,
    pub found_by_source_id: Option<i64>,
    /// None means the article was added manually, not by an ingest request
    pub ingest_request_id: Option<i64>,
}

/// Fields for a new article row
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_date: Option<DateTime<Utc>>,
    pub publication_name: String,
    pub author: Option<String>,
    pub found_by_source_id: i64,
    pub ingest_request_id: Option<i64>,
}

/// A raw article-like record as returned by an external aggregator, before
/// normalization. Everything except the link is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArticleItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub pub_date: Option<String>,
    pub source: Option<String>,
    pub author: Option<String>,
}

/// AND / OR / NOT keyword terms of an ingest request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryTerms {
    pub and_terms: Vec<String>,
    pub or_terms: Vec<String>,
    pub not_terms: Vec<String>,
}

impl QueryTerms {
    pub fn is_empty(&self) -> bool {
        self.and_terms.is_empty() && self.or_terms.is_empty() && self.not_terms.is_empty()
    }
}

/// Provenance handed to the ingestion pipeline along with a batch
#[derive(Debug, Clone, Copy)]
pub struct IngestProvenance {
    /// Aggregator source that discovered the articles
    pub source_id: i64,
    /// The originating ingest_requests row, finalized after the batch
    pub request_id: i64,
}

/// Result of ingesting one batch
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub request_id: i64,
    pub articles_received: usize,
    pub articles_saved: usize,
    pub article_ids: Vec<i64>,
}
