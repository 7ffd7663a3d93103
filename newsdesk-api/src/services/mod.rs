//! Business logic for newsdesk-api

pub mod aggregators;
pub mod content_approval;
pub mod ingest;
pub mod reconciliation;
pub mod reports;
pub mod sanitize;
