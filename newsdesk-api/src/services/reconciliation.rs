//! Human reconciliation engine
//!
//! Reconciles AI state proposals with human decisions, keeping the proposal
//! table and the confirmation table consistent: a confirmation row exists
//! for (article, state) if and only if the proposal's is_human_approved is
//! true. Both writes of a transition happen inside one transaction, so a
//! crash between them never leaves the pair inconsistent.

use crate::db::{articles, confirmations, proposals};
use crate::error::ApiError;
use crate::models::{ArticleDetailView, ReviewAction};
use sqlx::SqlitePool;
use tracing::info;

/// Apply a human decision to an AI state proposal and return the refreshed
/// article detail, so the caller never has to re-fetch.
///
/// Requires exactly one proposal row for the pair: zero rows is `NotFound`,
/// more than one is `DataIntegrity` (an upstream invariant violation that
/// must never be silently resolved by picking one).
pub async fn review_state(
    pool: &SqlitePool,
    article_id: i64,
    state_id: i64,
    action: ReviewAction,
) -> Result<ArticleDetailView, ApiError> {
    let matches = proposals::find_for_pair(pool, article_id, state_id).await?;
    match matches.len() {
        0 => {
            return Err(ApiError::NotFound(format!(
                "No AI state proposal exists for article {} with state {}",
                article_id, state_id
            )))
        }
        1 => {}
        n => {
            return Err(ApiError::DataIntegrity(format!(
                "Ambiguous proposal: {} rows for article {} with state {} - manual cleanup required",
                n, article_id, state_id
            )))
        }
    }

    match action {
        ReviewAction::Approve => approve(pool, article_id, state_id).await?,
        ReviewAction::Reject => reject(pool, article_id, state_id).await?,
    }

    articles::article_detail(pool, article_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No article exists with ID {}", article_id)))
}

/// Approve transition: proposal flag and confirmation insert as one atomic
/// unit. An existing confirmation means the goal is already satisfied and
/// the transition fails with `Conflict`, leaving nothing observably applied.
async fn approve(pool: &SqlitePool, article_id: i64, state_id: i64) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    if confirmations::exists(&mut tx, article_id, state_id).await? {
        return Err(ApiError::Conflict(format!(
            "Article {} already has human-approved state {}",
            article_id, state_id
        )));
    }

    proposals::set_human_approved(&mut tx, article_id, state_id, true).await?;

    // Two concurrent approvals can both pass the existence check above; the
    // UNIQUE constraint catches the loser here.
    if let Err(e) = confirmations::insert(&mut tx, article_id, state_id).await {
        if is_unique_violation(&e) {
            return Err(ApiError::Conflict(format!(
                "Article {} already has human-approved state {}",
                article_id, state_id
            )));
        }
        return Err(e.into());
    }

    tx.commit().await?;

    info!("Article {} state {} approved by human", article_id, state_id);

    Ok(())
}

/// Reject transition: flip the proposal flag and delete any confirmation.
/// Idempotent on the confirmation table - absence is not an error.
async fn reject(pool: &SqlitePool, article_id: i64, state_id: i64) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    proposals::set_human_approved(&mut tx, article_id, state_id, false).await?;
    confirmations::delete(&mut tx, article_id, state_id).await?;

    tx.commit().await?;

    info!("Article {} state {} rejected by human", article_id, state_id);

    Ok(())
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::articles::insert_article;
    use crate::db::proposals::insert_proposal;
    use crate::models::NewArticle;
    use sqlx::Row;

    async fn seeded_pool() -> (SqlitePool, i64) {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        newsdesk_common::db::init_schema(&pool).await.unwrap();

        let article_id = insert_article(
            &pool,
            &NewArticle {
                title: "Wildfire near Reno".to_string(),
                description: "Evacuations ordered".to_string(),
                url: "http://example.com/fire".to_string(),
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

    /// HumanStateConfirmation exists iff is_human_approved is true
    async fn assert_invariant(pool: &SqlitePool) {
        let rows = sqlx::query(
            r#"
            SELECT sp.article_id, sp.state_id, sp.is_human_approved,
                   (SELECT COUNT(*) FROM state_confirmations sc
                    WHERE sc.article_id = sp.article_id AND sc.state_id = sp.state_id)
                   AS confirmation_count
            FROM state_proposals sp
            WHERE sp.state_id IS NOT NULL
            "#,
        )
        .fetch_all(pool)
        .await
        .unwrap();

        for row in rows {
            let approved = row.get::<Option<i64>, _>("is_human_approved") == Some(1);
            let confirmed = row.get::<i64, _>("confirmation_count") > 0;
            assert_eq!(
                approved, confirmed,
                "invariant violated for article {} state {:?}",
                row.get::<i64, _>("article_id"),
                row.get::<Option<i64>, _>("state_id"),
            );
        }
    }

    #[tokio::test]
    async fn approve_then_reject_keeps_tables_consistent() {
        let (pool, article_id) = seeded_pool().await;
        insert_proposal(&pool, article_id, Some(5), Some(1), Some("mentions Carson City"))
            .await
            .unwrap();

        // Interleave decisions; the invariant must hold after every call
        for action in [
            ReviewAction::Approve,
            ReviewAction::Reject,
            ReviewAction::Reject,
            ReviewAction::Approve,
        ] {
            let result = review_state(&pool, article_id, 5, action).await;
            match action {
                ReviewAction::Approve => {
                    // Second approve in a row would conflict; here each
                    // approve follows a reject or a fresh proposal
                    result.unwrap();
                }
                ReviewAction::Reject => {
                    result.unwrap();
                }
            }
            assert_invariant(&pool).await;
        }
    }

    #[tokio::test]
    async fn random_interleaving_keeps_tables_consistent() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let (pool, article_id) = seeded_pool().await;
        insert_proposal(&pool, article_id, Some(5), Some(1), Some("mentions Carson City"))
            .await
            .unwrap();

        // Fixed seed so a failure reproduces
        let mut rng = StdRng::seed_from_u64(0x6e657773);
        let mut approved = false;

        for _ in 0..50 {
            let action = if rng.gen_bool(0.5) {
                ReviewAction::Approve
            } else {
                ReviewAction::Reject
            };

            let result = review_state(&pool, article_id, 5, action).await;
            match (action, approved) {
                // Approving an already-approved pair is the one allowed
                // failure, and it must change nothing
                (ReviewAction::Approve, true) => {
                    assert!(matches!(result, Err(ApiError::Conflict(_))));
                }
                (ReviewAction::Approve, false) => {
                    result.unwrap();
                    approved = true;
                }
                (ReviewAction::Reject, _) => {
                    result.unwrap();
                    approved = false;
                }
            }

            assert_invariant(&pool).await;
            let count = crate::db::confirmations::count_for_pair(&pool, article_id, 5)
                .await
                .unwrap();
            assert_eq!(count, if approved { 1 } else { 0 });
        }
    }

    #[tokio::test]
    async fn second_approve_conflicts_and_keeps_one_confirmation() {
        let (pool, article_id) = seeded_pool().await;
        insert_proposal(&pool, article_id, Some(5), None, None)
            .await
            .unwrap();

        review_state(&pool, article_id, 5, ReviewAction::Approve)
            .await
            .unwrap();
        let second = review_state(&pool, article_id, 5, ReviewAction::Approve).await;
        assert!(matches!(second, Err(ApiError::Conflict(_))));

        let count = crate::db::confirmations::count_for_pair(&pool, article_id, 5)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_invariant(&pool).await;
    }

    #[tokio::test]
    async fn reject_without_confirmation_is_idempotent() {
        let (pool, article_id) = seeded_pool().await;
        insert_proposal(&pool, article_id, Some(5), None, None)
            .await
            .unwrap();

        let detail = review_state(&pool, article_id, 5, ReviewAction::Reject)
            .await
            .unwrap();
        assert!(detail.state_human_approved_array.is_empty());

        let matches = proposals::find_for_pair(&pool, article_id, 5).await.unwrap();
        assert_eq!(matches[0].is_human_approved, Some(false));
        assert_invariant(&pool).await;
    }

    #[tokio::test]
    async fn missing_proposal_is_not_found() {
        let (pool, _) = seeded_pool().await;

        let result = review_state(&pool, 5, 2, ReviewAction::Approve).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn ambiguous_proposal_mutates_nothing() {
        let (pool, article_id) = seeded_pool().await;
        insert_proposal(&pool, article_id, Some(5), Some(1), None)
            .await
            .unwrap();
        insert_proposal(&pool, article_id, Some(5), Some(2), None)
            .await
            .unwrap();

        let result = review_state(&pool, article_id, 5, ReviewAction::Approve).await;
        assert!(matches!(result, Err(ApiError::DataIntegrity(_))));

        // Zero mutations: both proposals still pending, no confirmation
        let matches = proposals::find_for_pair(&pool, article_id, 5).await.unwrap();
        assert!(matches.iter().all(|p| p.is_human_approved.is_none()));
        let count = crate::db::confirmations::count_for_pair(&pool, article_id, 5)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn approve_returns_refreshed_detail() {
        let (pool, article_id) = seeded_pool().await;
        insert_proposal(&pool, article_id, Some(5), Some(3), Some("river flooding"))
            .await
            .unwrap();

        let detail = review_state(&pool, article_id, 5, ReviewAction::Approve)
            .await
            .unwrap();

        assert_eq!(detail.article_id, article_id);
        assert_eq!(detail.state_human_approved_array.len(), 1);
        assert_eq!(detail.state_human_approved_array[0].id, 5);
        let ai = detail.state_ai_approved.unwrap();
        assert_eq!(ai.is_human_approved, Some(true));
        assert_eq!(ai.state.id, 5);
    }
}
