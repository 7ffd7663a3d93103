//! HTTP API handlers for newsdesk-api

pub mod approvals;
pub mod health;
pub mod ingest;
pub mod reports;
pub mod state_review;

pub use approvals::approval_routes;
pub use health::health_routes;
pub use ingest::ingest_routes;
pub use reports::report_routes;
pub use state_review::analysis_routes;
