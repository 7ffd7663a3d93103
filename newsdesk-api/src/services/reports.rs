//! Read-side aggregation
//!
//! Pure joins and grouping, no writes. Articles with zero states or zero
//! approvals get empty arrays, never nulls.

use crate::db::reports::{self, ReportFlatRow, StateAssignmentRow};
use crate::error::ApiError;
use crate::models::{
    ApprovalView, ArticleStateView, ReportArticleView, StateAssignmentView, StateWithAbbreviation,
};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::info;

/// Articles with their AI state assignments, filtered on whether a state
/// was determined
pub async fn articles_with_state_assignments(
    pool: &SqlitePool,
    include_null_state: bool,
) -> Result<Vec<ArticleStateView>, ApiError> {
    let rows = reports::articles_with_state_assignments(pool, include_null_state).await?;
    info!("Found {} articles with state assignments", rows.len());

    Ok(rows.into_iter().map(to_state_view).collect())
}

fn to_state_view(row: StateAssignmentRow) -> ArticleStateView {
    ArticleStateView {
        id: row.article_id,
        title: row.title,
        description: row.description,
        url: row.url,
        created_at: row.created_at,
        state_assignment: StateAssignmentView {
            prompt_id: row.prompt_id,
            is_human_approved: row.is_human_approved,
            is_determined_to_be_error: row.is_determined_to_be_error,
            occurred_in_us: row.occurred_in_us,
            reasoning: row.reasoning,
            state_id: row.state_id,
            state_name: row.state_name,
        },
    }
}

/// The approved-articles report: grouped per article with deduplicated
/// state and approval arrays, filtered to articles that have at least one
/// approval with a truthy is_approved.
pub async fn approved_articles_report(
    pool: &SqlitePool,
) -> Result<Vec<ReportArticleView>, ApiError> {
    let rows = reports::articles_with_states_and_approvals(pool).await?;
    let mut grouped = group_report_rows(rows);

    grouped.retain(|article| article.approvals.iter().any(|a| a.is_approved));

    info!("Approved articles report: {} articles", grouped.len());

    Ok(grouped)
}

/// Fold flat join rows into per-article views.
///
/// Grouping key is the article id; scalar fields are first-seen-wins, array
/// fields accumulate unique child rows (states by state id, approvals by
/// approval id).
pub fn group_report_rows(rows: Vec<ReportFlatRow>) -> Vec<ReportArticleView> {
    let mut by_article: BTreeMap<i64, ReportArticleView> = BTreeMap::new();

    for row in rows {
        let article = by_article
            .entry(row.article_id)
            .or_insert_with(|| ReportArticleView {
                id: row.article_id,
                title: row.title.clone(),
                description: row.description.clone(),
                published_date: row.published_date.clone(),
                created_at: row.created_at.clone(),
                publication_name: row.publication_name.clone(),
                url: row.url.clone(),
                author: row.author.clone(),
                states: Vec::new(),
                approvals: Vec::new(),
                state_abbreviation: String::new(),
            });

        if let (Some(state_id), Some(name), Some(abbreviation)) = (
            row.state_id,
            row.state_name.clone(),
            row.state_abbreviation.clone(),
        ) {
            if !article.states.iter().any(|s| s.id == state_id) {
                article.states.push(StateWithAbbreviation {
                    id: state_id,
                    name,
                    abbreviation,
                });
            }
        }

        if let Some(approval_id) = row.approval_id {
            if !article.approvals.iter().any(|a| a.id == approval_id) {
                article.approvals.push(ApprovalView {
                    id: approval_id,
                    reviewer_id: row.approval_reviewer_id,
                    created_at: row.approval_created_at.clone().unwrap_or_default(),
                    is_approved: row.approval_is_approved.unwrap_or(false),
                    headline: row.approval_headline.clone(),
                    publication_name: row.approval_publication_name.clone(),
                    publication_date: row.approval_publication_date.clone(),
                    report_text: row.approval_report_text.clone(),
                    url: row.approval_url.clone(),
                });
            }
        }
    }

    let mut articles: Vec<ReportArticleView> = by_article.into_values().collect();
    for article in &mut articles {
        article.state_abbreviation = article
            .states
            .iter()
            .map(|s| s.abbreviation.as_str())
            .collect::<Vec<_>>()
            .join(", ");
    }

    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_row(article_id: i64) -> ReportFlatRow {
        ReportFlatRow {
            article_id,
            title: format!("Article {}", article_id),
            description: String::new(),
            published_date: None,
            created_at: "2026-08-01 12:00:00".to_string(),
            publication_name: "Unknown".to_string(),
            url: format!("http://example.com/{}", article_id),
            author: None,
            state_id: None,
            state_name: None,
            state_abbreviation: None,
            approval_id: None,
            approval_reviewer_id: None,
            approval_created_at: None,
            approval_is_approved: None,
            approval_headline: None,
            approval_publication_name: None,
            approval_publication_date: None,
            approval_report_text: None,
            approval_url: None,
        }
    }

    #[test]
    fn grouping_dedupes_states_and_approvals() {
        let mut row_a = flat_row(1);
        row_a.state_id = Some(5);
        row_a.state_name = Some("Nevada".to_string());
        row_a.state_abbreviation = Some("NV".to_string());
        row_a.approval_id = Some(10);
        row_a.approval_is_approved = Some(true);

        // Cartesian duplicate of the same state/approval pair
        let row_b = row_a.clone();

        let mut row_c = flat_row(1);
        row_c.state_id = Some(6);
        row_c.state_name = Some("California".to_string());
        row_c.state_abbreviation = Some("CA".to_string());
        row_c.approval_id = Some(10);
        row_c.approval_is_approved = Some(true);

        let grouped = group_report_rows(vec![row_a, row_b, row_c]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].states.len(), 2);
        assert_eq!(grouped[0].approvals.len(), 1);
        assert_eq!(grouped[0].state_abbreviation, "NV, CA");
    }

    #[test]
    fn articles_without_children_get_empty_arrays() {
        let grouped = group_report_rows(vec![flat_row(3)]);
        assert_eq!(grouped.len(), 1);
        assert!(grouped[0].states.is_empty());
        assert!(grouped[0].approvals.is_empty());
        assert_eq!(grouped[0].state_abbreviation, "");
    }

    #[tokio::test]
    async fn report_excludes_articles_without_truthy_approval() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        newsdesk_common::db::init_schema(&pool).await.unwrap();

        let approved = crate::db::articles::insert_article(
            &pool,
            &crate::models::NewArticle {
                title: "approved".to_string(),
                description: String::new(),
                url: "http://example.com/approved".to_string(),
                published_date: None,
                publication_name: "Unknown".to_string(),
                author: None,
                found_by_source_id: 1,
                ingest_request_id: None,
            },
        )
        .await
        .unwrap();
        let rejected = crate::db::articles::insert_article(
            &pool,
            &crate::models::NewArticle {
                title: "rejected".to_string(),
                description: String::new(),
                url: "http://example.com/rejected".to_string(),
                published_date: None,
                publication_name: "Unknown".to_string(),
                author: None,
                found_by_source_id: 1,
                ingest_request_id: None,
            },
        )
        .await
        .unwrap();

        crate::db::approvals::insert_approval(&pool, approved, None, true)
            .await
            .unwrap();
        crate::db::approvals::insert_approval(&pool, rejected, None, false)
            .await
            .unwrap();

        let report = approved_articles_report(&pool).await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].id, approved);
    }

    #[tokio::test]
    async fn state_assignment_listing_filters_null_states() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        newsdesk_common::db::init_schema(&pool).await.unwrap();

        let with_state = crate::db::articles::insert_article(
            &pool,
            &crate::models::NewArticle {
                title: "with state".to_string(),
                description: String::new(),
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
        let without_state = crate::db::articles::insert_article(
            &pool,
            &crate::models::NewArticle {
                title: "without state".to_string(),
                description: String::new(),
                url: "http://example.com/2".to_string(),
                published_date: None,
                publication_name: "Unknown".to_string(),
                author: None,
                found_by_source_id: 1,
                ingest_request_id: None,
            },
        )
        .await
        .unwrap();

        crate::db::proposals::insert_proposal(&pool, with_state, Some(5), None, None)
            .await
            .unwrap();
        crate::db::proposals::insert_proposal(&pool, without_state, None, None, None)
            .await
            .unwrap();

        let assigned = articles_with_state_assignments(&pool, false).await.unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, with_state);
        assert!(assigned[0].state_assignment.state_name.is_some());

        let unassigned = articles_with_state_assignments(&pool, true).await.unwrap();
        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].id, without_state);
        assert!(unassigned[0].state_assignment.state_id.is_none());
    }
}
