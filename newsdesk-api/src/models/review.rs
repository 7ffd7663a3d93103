//! Review-workflow models: AI proposals, human confirmations, report drafts

use serde::Serialize;

/// An AI-produced state classification for an article, pending human review.
///
/// `is_human_approved` is tri-state: None = pending, Some(true) = approved,
/// Some(false) = rejected.
#[derive(Debug, Clone, Serialize)]
pub struct StateProposal {
    pub id: i64,
    pub article_id: i64,
    /// None means the AI determined no state applies
    pub state_id: Option<i64>,
    pub prompt_id: Option<i64>,
    pub is_human_approved: Option<bool>,
    pub is_determined_to_be_error: bool,
    pub occurred_in_us: bool,
    pub reasoning: Option<String>,
}

/// AI-drafted report text for an article, the seed of content approval
#[derive(Debug, Clone, Serialize)]
pub struct ReportDraft {
    pub id: i64,
    pub article_id: i64,
    pub headline: Option<String>,
    pub publication_name: Option<String>,
    pub publication_date: Option<String>,
    pub report_text: Option<String>,
    pub url: Option<String>,
    pub is_approved: bool,
}

/// A human decision about an article's report-ready text
#[derive(Debug, Clone, Serialize)]
pub struct ReportApproval {
    pub id: i64,
    pub article_id: i64,
    pub reviewer_id: Option<i64>,
    pub is_approved: bool,
    pub headline: Option<String>,
    pub publication_name: Option<String>,
    pub publication_date: Option<String>,
    pub report_text: Option<String>,
    pub url: Option<String>,
}

/// Human action on an AI state proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    /// Parse the wire form; anything other than "approve"/"reject" is invalid
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approve" => Some(ReviewAction::Approve),
            "reject" => Some(ReviewAction::Reject),
            _ => None,
        }
    }
}
