//! Deduplication-aware batch ingestion
//!
//! Accepts a batch of externally-fetched article-like records plus
//! provenance and persists only the ones not already present, keyed by
//! exact url. Calling this twice with the same batch yields zero net new
//! rows the second time.

use crate::db::{articles, requests};
use crate::error::ApiError;
use crate::models::{IngestOutcome, IngestProvenance, NewArticle, RawArticleItem};
use crate::services::sanitize::sanitize_text;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Ingest one batch of raw items.
///
/// Items without a link are skipped and logged, never an error. Duplicate
/// urls (against storage, which the sequential per-item checks extend to
/// earlier items of the same batch) are skipped without updating existing
/// fields. Malformed dates leave published_date unset with a warning. The
/// originating request row is finalized with the saved count exactly once,
/// after the whole batch, so a partial count is never visible.
///
/// A persistence fault for a specific item fails the whole batch; the
/// request row then retains its last consistent state.
pub async fn ingest_batch(
    pool: &SqlitePool,
    items: &[RawArticleItem],
    provenance: IngestProvenance,
) -> Result<IngestOutcome, ApiError> {
    let mut article_ids = Vec::new();

    for item in items {
        let link = match item.link.as_deref().filter(|l| !l.is_empty()) {
            Some(link) => link,
            None => {
                warn!("Skipping article without link");
                continue;
            }
        };

        if articles::find_id_by_url(pool, link).await?.is_some() {
            info!("Skipping duplicate article: {}", link);
            continue;
        }

        let published_date = item.pub_date.as_deref().and_then(|raw| {
            let parsed = parse_pub_date(raw);
            if parsed.is_none() {
                warn!("Failed to parse pubDate: {}", raw);
            }
            parsed
        });

        let article = NewArticle {
            title: sanitize_text(item.title.as_deref().unwrap_or("")),
            description: sanitize_text(item.description.as_deref().unwrap_or("")),
            url: link.to_string(),
            published_date,
            publication_name: item
                .source
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("Unknown")
                .to_string(),
            author: item.author.clone(),
            found_by_source_id: provenance.source_id,
            ingest_request_id: Some(provenance.request_id),
        };

        let article_id = articles::insert_article(pool, &article).await?;
        article_ids.push(article_id);

        // Persist a content record when the item carries body text
        if let Some(content) = item.content.as_deref().or(item.description.as_deref()) {
            if !content.is_empty() {
                articles::insert_content(pool, article_id, &sanitize_text(content)).await?;
            }
        }
    }

    let articles_saved = article_ids.len();
    requests::finalize_request(pool, provenance.request_id, articles_saved).await?;

    info!(
        "Stored {} new articles for request {} ({} received)",
        articles_saved,
        provenance.request_id,
        items.len()
    );

    Ok(IngestOutcome {
        request_id: provenance.request_id,
        articles_received: items.len(),
        articles_saved,
        article_ids,
    })
}

/// Parse an aggregator-supplied publication date.
///
/// Aggregators disagree on formats: NewsAPI/GNews emit RFC3339, RSS feeds
/// RFC2822, and some sources a bare date.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}
