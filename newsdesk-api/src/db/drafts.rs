//! AI report draft rows (content-approval seeds)

use crate::models::ReportDraft;
use sqlx::{Row, SqlitePool};

fn map_row(row: &sqlx::sqlite::SqliteRow) -> ReportDraft {
    ReportDraft {
        id: row.get("id"),
        article_id: row.get("article_id"),
        headline: row.get("headline"),
        publication_name: row.get("publication_name"),
        publication_date: row.get("publication_date"),
        report_text: row.get("report_text"),
        url: row.get("url"),
        is_approved: row.get::<i64, _>("is_approved") != 0,
    }
}

/// Load every draft row for an article, so the caller can detect the
/// zero-row and multiple-row anomalies
pub async fn find_for_article(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Vec<ReportDraft>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, headline, publication_name, publication_date,
               report_text, url, is_approved
        FROM ai_report_drafts
        WHERE article_id = ?
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_row).collect())
}

/// Insert a draft row. The external AI system is the normal writer of this
/// table; this is used for seeding and tests.
#[allow(clippy::too_many_arguments)]
pub async fn insert_draft(
    pool: &SqlitePool,
    article_id: i64,
    headline: Option<&str>,
    publication_name: Option<&str>,
    publication_date: Option<&str>,
    report_text: Option<&str>,
    url: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO ai_report_drafts
            (article_id, headline, publication_name, publication_date, report_text, url)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(article_id)
    .bind(headline)
    .bind(publication_name)
    .bind(publication_date)
    .bind(report_text)
    .bind(url)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}
