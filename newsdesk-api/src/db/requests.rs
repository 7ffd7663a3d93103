//! Ingest request rows: one per external fetch attempt
//!
//! Lifecycle: created at request time, finalized exactly once with the saved
//! count after ingestion completes, immutable afterward.

use crate::models::QueryTerms;
use sqlx::SqlitePool;

/// Create an ingest request row, returning its id
pub async fn create_request(
    pool: &SqlitePool,
    source_id: i64,
    terms: &QueryTerms,
    request_url: Option<&str>,
    count_received: usize,
    status: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO ingest_requests
            (source_id, and_terms, or_terms, not_terms, request_url, count_received, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(source_id)
    .bind(join_terms(&terms.and_terms))
    .bind(join_terms(&terms.or_terms))
    .bind(join_terms(&terms.not_terms))
    .bind(request_url)
    .bind(count_received as i64)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Record the final saved count. Called once, at the end of the batch, so a
/// partial count is never visible.
pub async fn finalize_request(
    pool: &SqlitePool,
    request_id: i64,
    count_saved: usize,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE ingest_requests SET count_saved = ? WHERE id = ?")
        .bind(count_saved as i64)
        .bind(request_id)
        .execute(pool)
        .await?;

    Ok(())
}

fn join_terms(terms: &[String]) -> Option<String> {
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn create_then_finalize() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        newsdesk_common::db::init_schema(&pool).await.unwrap();

        let terms = QueryTerms {
            and_terms: vec!["flood".to_string(), "levee".to_string()],
            or_terms: vec![],
            not_terms: vec!["sports".to_string()],
        };
        let id = create_request(&pool, 1, &terms, Some("http://api.example.com"), 12, "success")
            .await
            .unwrap();

        finalize_request(&pool, id, 7).await.unwrap();

        let row = sqlx::query("SELECT and_terms, not_terms, count_received, count_saved FROM ingest_requests WHERE id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.get::<String, _>("and_terms"), "flood, levee");
        assert_eq!(row.get::<String, _>("not_terms"), "sports");
        assert_eq!(row.get::<i64, _>("count_received"), 12);
        assert_eq!(row.get::<Option<i64>, _>("count_saved"), Some(7));
    }
}
