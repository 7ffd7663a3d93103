//! Database access for newsdesk-api
//!
//! One module per table, runtime-checked sqlx queries throughout. Functions
//! that must participate in a caller-owned transaction take
//! `&mut SqliteConnection` instead of the pool.

pub mod approvals;
pub mod articles;
pub mod confirmations;
pub mod drafts;
pub mod proposals;
pub mod reports;
pub mod requests;
pub mod sources;
