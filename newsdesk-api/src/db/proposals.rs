//! AI state proposal rows

use crate::models::StateProposal;
use sqlx::{Row, SqliteConnection, SqlitePool};

fn map_row(row: &sqlx::sqlite::SqliteRow) -> StateProposal {
    StateProposal {
        id: row.get("id"),
        article_id: row.get("article_id"),
        state_id: row.get("state_id"),
        prompt_id: row.get("prompt_id"),
        is_human_approved: row.get::<Option<i64>, _>("is_human_approved").map(|v| v != 0),
        is_determined_to_be_error: row.get::<i64, _>("is_determined_to_be_error") != 0,
        occurred_in_us: row.get::<i64, _>("occurred_in_us") != 0,
        reasoning: row.get("reasoning"),
    }
}

/// Load every proposal row for an (article, state) pair.
///
/// Returns all matches so the caller can detect the zero-row and
/// multiple-row anomalies instead of silently picking one.
pub async fn find_for_pair(
    pool: &SqlitePool,
    article_id: i64,
    state_id: i64,
) -> Result<Vec<StateProposal>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, state_id, prompt_id, is_human_approved,
               is_determined_to_be_error, occurred_in_us, reasoning
        FROM state_proposals
        WHERE article_id = ? AND state_id = ?
        "#,
    )
    .bind(article_id)
    .bind(state_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_row).collect())
}

/// Set the human decision on a proposal pair, inside the caller's transaction
pub async fn set_human_approved(
    conn: &mut SqliteConnection,
    article_id: i64,
    state_id: i64,
    approved: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE state_proposals SET is_human_approved = ? WHERE article_id = ? AND state_id = ?",
    )
    .bind(approved)
    .bind(article_id)
    .bind(state_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Insert a proposal row. The external AI system is the normal writer of
/// this table; this is used for seeding and tests.
pub async fn insert_proposal(
    pool: &SqlitePool,
    article_id: i64,
    state_id: Option<i64>,
    prompt_id: Option<i64>,
    reasoning: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO state_proposals (article_id, state_id, prompt_id, reasoning)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(article_id)
    .bind(state_id)
    .bind(prompt_id)
    .bind(reasoning)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::articles;
    use crate::models::NewArticle;

    async fn seeded_pool() -> (SqlitePool, i64) {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        newsdesk_common::db::init_schema(&pool).await.unwrap();

        let article_id = articles::insert_article(
            &pool,
            &NewArticle {
                title: "t".to_string(),
                description: "d".to_string(),
                url: "http://example.com/1".to_string(),
                published_date: None,
                publication_name: "Unknown".to_string(),
                author: None,
                found_by_source_id: 1,
                ingest_request_id: None,
            },
        )
        .await
        .unwrap();

        (pool, article_id)
    }

    #[tokio::test]
    async fn pair_lookup_returns_all_matches() {
        let (pool, article_id) = seeded_pool().await;

        insert_proposal(&pool, article_id, Some(5), Some(1), Some("mentions Sacramento"))
            .await
            .unwrap();
        insert_proposal(&pool, article_id, Some(5), Some(2), None)
            .await
            .unwrap();
        insert_proposal(&pool, article_id, Some(6), None, None)
            .await
            .unwrap();

        let matches = find_for_pair(&pool, article_id, 5).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|p| p.is_human_approved.is_none()));

        let none = find_for_pair(&pool, article_id, 7).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn set_human_approved_flips_tristate() {
        let (pool, article_id) = seeded_pool().await;
        insert_proposal(&pool, article_id, Some(5), None, None)
            .await
            .unwrap();

        let mut tx = pool.begin().await.unwrap();
        set_human_approved(&mut tx, article_id, 5, true).await.unwrap();
        tx.commit().await.unwrap();

        let matches = find_for_pair(&pool, article_id, 5).await.unwrap();
        assert_eq!(matches[0].is_human_approved, Some(true));
    }
}
