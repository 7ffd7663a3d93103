//! Denormalized read-side views returned to HTTP clients

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A (state id, name) reference
#[derive(Debug, Clone, Serialize)]
pub struct StateRef {
    pub id: i64,
    pub name: String,
}

/// A state reference including its postal abbreviation
#[derive(Debug, Clone, Serialize)]
pub struct StateWithAbbreviation {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
}

/// The AI proposal attached to an article detail view
#[derive(Debug, Clone, Serialize)]
pub struct AiProposalView {
    pub prompt_id: Option<i64>,
    pub is_human_approved: Option<bool>,
    pub reasoning: Option<String>,
    pub state: StateRef,
}

/// Full article detail: human-confirmed states plus the AI proposal.
/// Returned by the reconciliation engine after every transition so the
/// caller never has to re-fetch.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetailView {
    pub article_id: i64,
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub state_human_approved_array: Vec<StateRef>,
    pub state_ai_approved: Option<AiProposalView>,
}

/// The AI state assignment attached to a state-assignment listing row
#[derive(Debug, Clone, Serialize)]
pub struct StateAssignmentView {
    pub prompt_id: Option<i64>,
    pub is_human_approved: Option<bool>,
    pub is_determined_to_be_error: bool,
    pub occurred_in_us: bool,
    pub reasoning: Option<String>,
    pub state_id: Option<i64>,
    pub state_name: Option<String>,
}

/// One row of the state-assignment listing
#[derive(Debug, Clone, Serialize)]
pub struct ArticleStateView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub created_at: String,
    pub state_assignment: StateAssignmentView,
}

/// One report approval attached to an approved-articles report row
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalView {
    pub id: i64,
    pub reviewer_id: Option<i64>,
    pub created_at: String,
    pub is_approved: bool,
    pub headline: Option<String>,
    pub publication_name: Option<String>,
    pub publication_date: Option<String>,
    pub report_text: Option<String>,
    pub url: Option<String>,
}

/// One article of the approved-articles report, with accumulated unique
/// child rows. Arrays are empty, never null, for articles without children.
#[derive(Debug, Clone, Serialize)]
pub struct ReportArticleView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub published_date: Option<DateTime<Utc>>,
    pub created_at: String,
    pub publication_name: String,
    pub url: String,
    pub author: Option<String>,
    pub states: Vec<StateWithAbbreviation>,
    pub approvals: Vec<ApprovalView>,
    /// Joined abbreviation string ("CA" or "CA, NV"), empty when no states
    pub state_abbreviation: String,
}
