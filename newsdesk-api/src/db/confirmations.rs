//! Human state confirmation rows
//!
//! Row existence denotes human approval of an (article, state) pair. The
//! reconciliation engine is the sole writer, always inside a transaction.

use sqlx::{SqliteConnection, SqlitePool};

/// Check whether a confirmation exists for the pair, inside the caller's
/// transaction
pub async fn exists(
    conn: &mut SqliteConnection,
    article_id: i64,
    state_id: i64,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM state_confirmations WHERE article_id = ? AND state_id = ?",
    )
    .bind(article_id)
    .bind(state_id)
    .fetch_optional(conn)
    .await?;

    Ok(found.is_some())
}

/// Insert a confirmation for the pair. The UNIQUE(article_id, state_id)
/// constraint surfaces a concurrent double-approve as a unique violation.
pub async fn insert(
    conn: &mut SqliteConnection,
    article_id: i64,
    state_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO state_confirmations (article_id, state_id) VALUES (?, ?)")
        .bind(article_id)
        .bind(state_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Delete any confirmation for the pair. Absence is not an error.
pub async fn delete(
    conn: &mut SqliteConnection,
    article_id: i64,
    state_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM state_confirmations WHERE article_id = ? AND state_id = ?")
        .bind(article_id)
        .bind(state_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Count confirmations for a pair (used by tests and integrity checks)
pub async fn count_for_pair(
    pool: &SqlitePool,
    article_id: i64,
    state_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM state_confirmations WHERE article_id = ? AND state_id = ?",
    )
    .bind(article_id)
    .bind(state_id)
    .fetch_one(pool)
    .await
}
