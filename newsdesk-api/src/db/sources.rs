//! Aggregator source rows

use sqlx::SqlitePool;

/// Find a source id by org name
pub async fn find_id_by_name(pool: &SqlitePool, name: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM aggregator_sources WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await
}

/// Find-or-create a source row, returning its id
pub async fn ensure_source(
    pool: &SqlitePool,
    name: &str,
    is_api: bool,
    is_rss: bool,
) -> Result<i64, sqlx::Error> {
    if let Some(id) = find_id_by_name(pool, name).await? {
        return Ok(id);
    }

    let result = sqlx::query(
        "INSERT INTO aggregator_sources (name, is_api, is_rss) VALUES (?, ?, ?)",
    )
    .bind(name)
    .bind(is_api)
    .bind(is_rss)
    .execute(pool)
    .await?;

    tracing::info!("Created aggregator source: {}", name);

    Ok(result.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_source_is_idempotent() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        newsdesk_common::db::init_schema(&pool).await.unwrap();

        let first = ensure_source(&pool, "Example Wire", true, false).await.unwrap();
        let second = ensure_source(&pool, "Example Wire", true, false).await.unwrap();
        assert_eq!(first, second);

        // Seeded sources resolve without inserting
        let seeded = find_id_by_name(&pool, newsdesk_common::db::SOURCE_NEWSAPI)
            .await
            .unwrap();
        assert!(seeded.is_some());
    }
}
