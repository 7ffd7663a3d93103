//! Google News RSS client
//!
//! Unlike the JSON aggregators this one is split into a fetch step and a
//! save step: the fetch endpoint returns the parsed batch to the caller
//! without touching the database, and the caller posts the batch back for
//! storage once reviewed.

use crate::error::ApiError;
use crate::models::RawArticleItem;
use tracing::info;

const GOOGLE_RSS_BASE_URL: &str = "https://news.google.com/rss/search";

/// Build the search feed url for a query constrained to a trailing window
/// like "7d"
pub fn build_rss_url(query: &str, time_range: &str) -> Result<String, ApiError> {
    let q = format!("{} when:{}", query, time_range);
    let url = reqwest::Url::parse_with_params(
        GOOGLE_RSS_BASE_URL,
        &[("q", q.as_str()), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")],
    )
    .map_err(|e| ApiError::Upstream(format!("Invalid Google News url: {}", e)))?;
    Ok(url.to_string())
}

/// Fetch and parse a Google News search feed into a normalized batch
pub async fn fetch_rss_items(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<RawArticleItem>, ApiError> {
    info!("Fetching Google News RSS feed: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("Google News request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Upstream(format!(
            "Google News error: HTTP {}",
            status.as_u16()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Upstream(format!("Google News body read failed: {}", e)))?;

    let channel = rss::Channel::read_from(&bytes[..])
        .map_err(|e| ApiError::Upstream(format!("Google News feed parse failed: {}", e)))?;

    info!("Google News feed returned {} items", channel.items().len());

    Ok(channel.items().iter().map(to_raw_item).collect())
}

fn to_raw_item(item: &rss::Item) -> RawArticleItem {
    RawArticleItem {
        title: item.title().map(str::to_string),
        link: item.link().map(str::to_string),
        description: item.description().map(str::to_string),
        content: None,
        pub_date: item.pub_date().map(str::to_string),
        source: item.source().and_then(|s| s.title()).map(str::to_string),
        author: item.author().map(str::to_string),
    }
}
