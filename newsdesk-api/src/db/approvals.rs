//! Report approval rows (human content decisions)

use crate::models::{ReportApproval, ReportDraft};
use sqlx::{Row, SqliteConnection, SqlitePool};

fn map_row(row: &sqlx::sqlite::SqliteRow) -> ReportApproval {
    ReportApproval {
        id: row.get("id"),
        article_id: row.get("article_id"),
        reviewer_id: row.get("reviewer_id"),
        is_approved: row.get::<i64, _>("is_approved") != 0,
        headline: row.get("headline"),
        publication_name: row.get("publication_name"),
        publication_date: row.get("publication_date"),
        report_text: row.get("report_text"),
        url: row.get("url"),
    }
}

/// Load the existing approval row for an article, if any, inside the
/// caller's transaction (the existence re-check that guards the
/// create-or-update write)
pub async fn find_for_article(
    conn: &mut SqliteConnection,
    article_id: i64,
) -> Result<Option<ReportApproval>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, article_id, reviewer_id, is_approved, headline,
               publication_name, publication_date, report_text, url
        FROM report_approvals
        WHERE article_id = ?
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(article_id)
    .fetch_optional(conn)
    .await?;

    Ok(row.as_ref().map(map_row))
}

/// Insert an approval copying the AI draft's report fields
pub async fn insert_from_draft(
    conn: &mut SqliteConnection,
    article_id: i64,
    reviewer_id: Option<i64>,
    draft: &ReportDraft,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO report_approvals
            (article_id, reviewer_id, is_approved, headline, publication_name,
             publication_date, report_text, url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(article_id)
    .bind(reviewer_id)
    .bind(draft.is_approved)
    .bind(&draft.headline)
    .bind(&draft.publication_name)
    .bind(&draft.publication_date)
    .bind(&draft.report_text)
    .bind(&draft.url)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite a previously rejected approval in place with the draft's
/// report fields, marking it approved
pub async fn update_from_draft(
    conn: &mut SqliteConnection,
    approval_id: i64,
    draft: &ReportDraft,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE report_approvals
        SET is_approved = 1, headline = ?, publication_name = ?,
            publication_date = ?, report_text = ?, url = ?
        WHERE id = ?
        "#,
    )
    .bind(&draft.headline)
    .bind(&draft.publication_name)
    .bind(&draft.publication_date)
    .bind(&draft.report_text)
    .bind(&draft.url)
    .bind(approval_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Insert a bare approval row (used by tests seeding report data)
pub async fn insert_approval(
    pool: &SqlitePool,
    article_id: i64,
    reviewer_id: Option<i64>,
    is_approved: bool,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO report_approvals (article_id, reviewer_id, is_approved) VALUES (?, ?, ?)",
    )
    .bind(article_id)
    .bind(reviewer_id)
    .bind(is_approved)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}
