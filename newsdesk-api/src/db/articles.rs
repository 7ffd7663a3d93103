//! Article persistence and the article detail view

use crate::models::{AiProposalView, ArticleDetailView, NewArticle, StateRef};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// Look up an article id by exact url match (the dedup key)
pub async fn find_id_by_url(pool: &SqlitePool, url: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM articles WHERE url = ?")
        .bind(url)
        .fetch_optional(pool)
        .await
}

/// Insert a new article row, returning its id
pub async fn insert_article(pool: &SqlitePool, article: &NewArticle) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO articles
            (title, description, url, published_date, publication_name, author,
             found_by_source_id, ingest_request_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&article.title)
    .bind(&article.description)
    .bind(&article.url)
    .bind(article.published_date.map(|d| d.to_rfc3339()))
    .bind(&article.publication_name)
    .bind(&article.author)
    .bind(article.found_by_source_id)
    .bind(article.ingest_request_id)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Persist an associated content record for an article
pub async fn insert_content(
    pool: &SqlitePool,
    article_id: i64,
    content: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO article_contents (article_id, content) VALUES (?, ?)")
        .bind(article_id)
        .bind(content)
        .execute(pool)
        .await?;

    Ok(())
}

/// Count total articles
pub async fn count_articles(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(pool)
        .await
}

/// Load the full article detail: scalar fields, content, every
/// human-confirmed state, and the AI proposal.
///
/// One flat LEFT-JOIN query folded in memory; the human-state array is
/// deduplicated by state id, the AI proposal is taken from the first row
/// that carries one.
pub async fn article_detail(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Option<ArticleDetailView>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            a.id AS article_id,
            a.title,
            a.description,
            a.url,
            c.content,
            hs.id AS human_state_id,
            hs.name AS human_state_name,
            sp.prompt_id,
            sp.is_human_approved,
            sp.reasoning,
            ai_s.id AS ai_state_id,
            ai_s.name AS ai_state_name
        FROM articles a
        LEFT JOIN article_contents c ON c.article_id = a.id
        LEFT JOIN state_confirmations sc ON sc.article_id = a.id
        LEFT JOIN us_states hs ON hs.id = sc.state_id
        LEFT JOIN state_proposals sp ON sp.article_id = a.id
        LEFT JOIN us_states ai_s ON ai_s.id = sp.state_id
        WHERE a.id = ?
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    let first = match rows.first() {
        Some(row) => row,
        None => return Ok(None),
    };

    let mut detail = ArticleDetailView {
        article_id: first.get("article_id"),
        title: first.get("title"),
        description: first.get("description"),
        url: first.get("url"),
        content: first.get("content"),
        state_human_approved_array: Vec::new(),
        state_ai_approved: None,
    };

    for row in &rows {
        if let Some(state_id) = row.get::<Option<i64>, _>("human_state_id") {
            if !detail
                .state_human_approved_array
                .iter()
                .any(|s| s.id == state_id)
            {
                detail.state_human_approved_array.push(StateRef {
                    id: state_id,
                    name: row.get("human_state_name"),
                });
            }
        }

        if detail.state_ai_approved.is_none() {
            if let Some(ai_state_id) = row.get::<Option<i64>, _>("ai_state_id") {
                detail.state_ai_approved = Some(AiProposalView {
                    prompt_id: row.get("prompt_id"),
                    is_human_approved: row
                        .get::<Option<i64>, _>("is_human_approved")
                        .map(|v| v != 0),
                    reasoning: row.get("reasoning"),
                    state: StateRef {
                        id: ai_state_id,
                        name: row.get("ai_state_name"),
                    },
                });
            }
        }
    }

    Ok(Some(detail))
}

/// Parse a stored RFC3339 published_date back into a timestamp. Rows
/// predating ingestion-side parsing may carry other formats; those read
/// back as None rather than failing the query.
pub fn parse_published_date(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        newsdesk_common::db::init_schema(&pool).await.unwrap();
        pool
    }

    fn new_article(url: &str) -> NewArticle {
        NewArticle {
            title: "Storm damages boardwalk".to_string(),
            description: "Coastal damage reported".to_string(),
            url: url.to_string(),
            published_date: None,
            publication_name: "Unknown".to_string(),
            author: None,
            found_by_source_id: 1,
            ingest_request_id: None,
        }
    }

    #[tokio::test]
    async fn insert_and_find_by_url() {
        let pool = test_pool().await;

        let id = insert_article(&pool, &new_article("http://example.com/1"))
            .await
            .unwrap();
        assert!(id > 0);

        let found = find_id_by_url(&pool, "http://example.com/1").await.unwrap();
        assert_eq!(found, Some(id));

        let missing = find_id_by_url(&pool, "http://example.com/2").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn detail_includes_content_and_empty_arrays() {
        let pool = test_pool().await;

        let id = insert_article(&pool, &new_article("http://example.com/1"))
            .await
            .unwrap();
        insert_content(&pool, id, "Full article text").await.unwrap();

        let detail = article_detail(&pool, id).await.unwrap().unwrap();
        assert_eq!(detail.article_id, id);
        assert_eq!(detail.content.as_deref(), Some("Full article text"));
        assert!(detail.state_human_approved_array.is_empty());
        assert!(detail.state_ai_approved.is_none());
    }

    #[tokio::test]
    async fn detail_missing_article_is_none() {
        let pool = test_pool().await;
        let detail = article_detail(&pool, 999).await.unwrap();
        assert!(detail.is_none());
    }

    #[test]
    fn published_date_round_trips_and_tolerates_bad_rows() {
        let stored = Some("2026-08-02T15:00:00+00:00".to_string());
        let parsed = parse_published_date(stored).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-08-02T15:00:00+00:00");

        assert!(parse_published_date(Some("not a date".to_string())).is_none());
        assert!(parse_published_date(None).is_none());
    }
}
