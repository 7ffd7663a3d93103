//! GNews client

use crate::error::ApiError;
use crate::models::RawArticleItem;
use serde::Deserialize;
use tracing::info;

const GNEWS_BASE_URL: &str = "https://gnews.io/api/v4/search";

#[derive(Debug, Deserialize)]
struct GNewsResponse {
    #[serde(default, rename = "totalArticles")]
    total_articles: u64,
    #[serde(default)]
    articles: Vec<GNewsArticle>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GNewsArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    source: Option<GNewsSource>,
}

#[derive(Debug, Deserialize)]
struct GNewsSource {
    name: Option<String>,
}

/// Fetch articles from GNews, returning the request url and the normalized
/// batch
pub async fn fetch_articles(
    client: &reqwest::Client,
    api_key: &str,
    query: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
    max: Option<u32>,
) -> Result<(String, Vec<RawArticleItem>), ApiError> {
    let mut params = vec![
        ("q".to_string(), query.to_string()),
        ("token".to_string(), api_key.to_string()),
        ("lang".to_string(), "en".to_string()),
        ("country".to_string(), "us".to_string()),
    ];
    if let Some(from) = start_date {
        params.push(("from".to_string(), from.to_string()));
    }
    if let Some(to) = end_date {
        params.push(("to".to_string(), to.to_string()));
    }
    if let Some(max) = max {
        params.push(("max".to_string(), max.to_string()));
    }

    let url = reqwest::Url::parse_with_params(GNEWS_BASE_URL, &params)
        .map_err(|e| ApiError::Upstream(format!("Invalid GNews url: {}", e)))?;
    info!("Fetching GNews articles for query: {}", query);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("GNews request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Upstream(format!(
            "GNews error: HTTP {}",
            status.as_u16()
        )));
    }

    let body: GNewsResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Upstream(format!("GNews response parse failed: {}", e)))?;

    if let Some(errors) = body.errors {
        return Err(ApiError::Upstream(format!("GNews error: {}", errors)));
    }

    info!(
        "GNews returned {} of {} articles",
        body.articles.len(),
        body.total_articles
    );

    let items = body.articles.into_iter().map(to_raw_item).collect();

    Ok((url.to_string(), items))
}

fn to_raw_item(article: GNewsArticle) -> RawArticleItem {
    RawArticleItem {
        title: article.title,
        link: article.url,
        description: article.description,
        content: article.content,
        pub_date: article.published_at,
        source: article.source.and_then(|s| s.name),
        author: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_normalizes_into_raw_items() {
        let body = r#"{
            "totalArticles": 1,
            "articles": [{
                "title": "Tornado touches down",
                "description": "Damage in two counties",
                "content": "Full text...",
                "url": "http://example.com/tornado",
                "image": "http://example.com/img.jpg",
                "publishedAt": "2026-08-02T15:00:00Z",
                "source": {"name": "Plains Gazette", "url": "http://gazette.example.com"}
            }]
        }"#;

        let parsed: GNewsResponse = serde_json::from_str(body).unwrap();
        let item = to_raw_item(parsed.articles.into_iter().next().unwrap());
        assert_eq!(item.link.as_deref(), Some("http://example.com/tornado"));
        assert_eq!(item.source.as_deref(), Some("Plains Gazette"));
        assert!(item.author.is_none());
    }
}
