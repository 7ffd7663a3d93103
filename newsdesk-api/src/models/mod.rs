//! Data models for newsdesk-api

pub mod article;
pub mod review;
pub mod views;

pub use article::{Article, IngestOutcome, IngestProvenance, NewArticle, QueryTerms, RawArticleItem};
pub use review::{ReportApproval, ReportDraft, ReviewAction, StateProposal};
pub use views::{
    AiProposalView, ApprovalView, ArticleDetailView, ArticleStateView, ReportArticleView,
    StateAssignmentView, StateRef, StateWithAbbreviation,
};
