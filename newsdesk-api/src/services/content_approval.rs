//! Content-approval workflow
//!
//! Tracks whether an article's report-ready text has been approved by a
//! human, seeded from the AI-generated draft. Simpler than state
//! reconciliation: only one table is written, but the create-or-update is
//! still guarded by re-checking existence inside the transaction.

use crate::db::{approvals, drafts};
use crate::error::ApiError;
use sqlx::SqlitePool;
use tracing::info;

/// Human-approve an article's AI-drafted report.
///
/// Requires exactly one draft row for the article. A previously rejected
/// approval is updated in place with the draft's report fields; an already
/// granted approval fails with `AlreadyApproved`.
pub async fn approve_content(
    pool: &SqlitePool,
    article_id: i64,
    reviewer_id: Option<i64>,
) -> Result<String, ApiError> {
    let matches = drafts::find_for_article(pool, article_id).await?;
    let draft = match matches.len() {
        0 => {
            return Err(ApiError::NotFound(format!(
                "No AI report draft exists for article {}",
                article_id
            )))
        }
        1 => &matches[0],
        n => {
            return Err(ApiError::DataIntegrity(format!(
                "Ambiguous draft: {} rows for article {} - manual cleanup required",
                n, article_id
            )))
        }
    };

    let mut tx = pool.begin().await?;

    match approvals::find_for_article(&mut tx, article_id).await? {
        Some(existing) if existing.is_approved => {
            return Err(ApiError::AlreadyApproved(format!(
                "Article {} report is already approved",
                article_id
            )));
        }
        Some(existing) => {
            approvals::update_from_draft(&mut tx, existing.id, draft).await?;
        }
        None => {
            approvals::insert_from_draft(&mut tx, article_id, reviewer_id, draft).await?;
        }
    }

    tx.commit().await?;

    info!("Article {} report approved by human", article_id);

    Ok(format!("Article {} report approved", article_id))
}
