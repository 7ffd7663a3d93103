//! Flat read-side report queries
//!
//! These return denormalized join rows; grouping and filtering live in
//! `services::reports`.

use crate::db::articles;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// One row of the articles-with-state-assignments join
#[derive(Debug, Clone)]
pub struct StateAssignmentRow {
    pub article_id: i64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub created_at: String,
    pub prompt_id: Option<i64>,
    pub is_human_approved: Option<bool>,
    pub is_determined_to_be_error: bool,
    pub occurred_in_us: bool,
    pub reasoning: Option<String>,
    pub state_id: Option<i64>,
    pub state_name: Option<String>,
}

/// Articles joined with their AI state proposals, filtered on whether the
/// proposal carries a state
pub async fn articles_with_state_assignments(
    pool: &SqlitePool,
    include_null_state: bool,
) -> Result<Vec<StateAssignmentRow>, sqlx::Error> {
    let state_filter = if include_null_state {
        "sp.state_id IS NULL"
    } else {
        "sp.state_id IS NOT NULL"
    };

    let sql = format!(
        r#"
        SELECT
            a.id AS article_id,
            a.title,
            a.description,
            a.url,
            a.created_at,
            sp.prompt_id,
            sp.is_human_approved,
            sp.is_determined_to_be_error,
            sp.occurred_in_us,
            sp.reasoning,
            sp.state_id,
            s.name AS state_name
        FROM articles a
        INNER JOIN state_proposals sp ON sp.article_id = a.id
        LEFT JOIN us_states s ON s.id = sp.state_id
        WHERE {state_filter}
        ORDER BY a.created_at DESC
        "#
    );

    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    Ok(rows
        .iter()
        .map(|row| StateAssignmentRow {
            article_id: row.get("article_id"),
            title: row.get("title"),
            description: row.get("description"),
            url: row.get("url"),
            created_at: row.get("created_at"),
            prompt_id: row.get("prompt_id"),
            is_human_approved: row
                .get::<Option<i64>, _>("is_human_approved")
                .map(|v| v != 0),
            is_determined_to_be_error: row.get::<i64, _>("is_determined_to_be_error") != 0,
            occurred_in_us: row.get::<i64, _>("occurred_in_us") != 0,
            reasoning: row.get("reasoning"),
            state_id: row.get("state_id"),
            state_name: row.get("state_name"),
        })
        .collect())
}

/// One row of the flat article x confirmation x approval join
#[derive(Debug, Clone)]
pub struct ReportFlatRow {
    pub article_id: i64,
    pub title: String,
    pub description: String,
    pub published_date: Option<DateTime<Utc>>,
    pub created_at: String,
    pub publication_name: String,
    pub url: String,
    pub author: Option<String>,
    pub state_id: Option<i64>,
    pub state_name: Option<String>,
    pub state_abbreviation: Option<String>,
    pub approval_id: Option<i64>,
    pub approval_reviewer_id: Option<i64>,
    pub approval_created_at: Option<String>,
    pub approval_is_approved: Option<bool>,
    pub approval_headline: Option<String>,
    pub approval_publication_name: Option<String>,
    pub approval_publication_date: Option<String>,
    pub approval_report_text: Option<String>,
    pub approval_url: Option<String>,
}

/// Every article joined against its human-confirmed states and report
/// approvals. LEFT JOINs, so articles with neither still appear.
pub async fn articles_with_states_and_approvals(
    pool: &SqlitePool,
) -> Result<Vec<ReportFlatRow>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            a.id AS article_id,
            a.title,
            a.description,
            a.published_date,
            a.created_at,
            a.publication_name,
            a.url,
            a.author,
            s.id AS state_id,
            s.name AS state_name,
            s.abbreviation AS state_abbreviation,
            ra.id AS approval_id,
            ra.reviewer_id AS approval_reviewer_id,
            ra.created_at AS approval_created_at,
            ra.is_approved AS approval_is_approved,
            ra.headline AS approval_headline,
            ra.publication_name AS approval_publication_name,
            ra.publication_date AS approval_publication_date,
            ra.report_text AS approval_report_text,
            ra.url AS approval_url
        FROM articles a
        LEFT JOIN state_confirmations sc ON sc.article_id = a.id
        LEFT JOIN us_states s ON s.id = sc.state_id
        LEFT JOIN report_approvals ra ON ra.article_id = a.id
        ORDER BY a.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| ReportFlatRow {
            article_id: row.get("article_id"),
            title: row.get("title"),
            description: row.get("description"),
            published_date: articles::parse_published_date(row.get("published_date")),
            created_at: row.get("created_at"),
            publication_name: row.get("publication_name"),
            url: row.get("url"),
            author: row.get("author"),
            state_id: row.get("state_id"),
            state_name: row.get("state_name"),
            state_abbreviation: row.get("state_abbreviation"),
            approval_id: row.get("approval_id"),
            approval_reviewer_id: row.get("approval_reviewer_id"),
            approval_created_at: row.get("approval_created_at"),
            approval_is_approved: row
                .get::<Option<i64>, _>("approval_is_approved")
                .map(|v| v != 0),
            approval_headline: row.get("approval_headline"),
            approval_publication_name: row.get("approval_publication_name"),
            approval_publication_date: row.get("approval_publication_date"),
            approval_report_text: row.get("approval_report_text"),
            approval_url: row.get("approval_url"),
        })
        .collect())
}
