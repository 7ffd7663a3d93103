//! # Newsdesk Common Library
//!
//! Shared code for the newsdesk service:
//! - Error taxonomy
//! - Configuration resolution
//! - Database initialization and schema

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
