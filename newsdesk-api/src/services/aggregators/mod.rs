//! External aggregator clients
//!
//! Each client fetches from one aggregator and normalizes the response into
//! `RawArticleItem` records for the ingestion pipeline. The core never talks
//! to an aggregator directly; it only processes the batch a client returns.

pub mod gnews;
pub mod google_rss;
pub mod newsapi;
pub mod query;

use std::time::Duration;

const USER_AGENT: &str = concat!("newsdesk/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for aggregator fetches
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
        .expect("reqwest client construction cannot fail with static options")
}
