//! NewsAPI client

use crate::error::ApiError;
use crate::models::RawArticleItem;
use serde::Deserialize;
use tracing::info;

const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2/everything";

/// NewsAPI /v2/everything response envelope
#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "totalResults")]
    total_results: u64,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    source: Option<NewsApiSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

/// Fetch articles from NewsAPI, returning the request url and the
/// normalized batch
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
        ("apiKey".to_string(), api_key.to_string()),
    ];
    if let Some(from) = start_date {
        params.push(("from".to_string(), from.to_string()));
    }
    if let Some(to) = end_date {
        params.push(("to".to_string(), to.to_string()));
    }
    if let Some(page_size) = max {
        params.push(("pageSize".to_string(), page_size.to_string()));
    }

    let url = reqwest::Url::parse_with_params(NEWSAPI_BASE_URL, &params)
        .map_err(|e| ApiError::Upstream(format!("Invalid NewsAPI url: {}", e)))?;
    // Do not log the url itself, it carries the API key
    info!("Fetching NewsAPI articles for query: {}", query);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("NewsAPI request failed: {}", e)))?;

    let status = response.status();
    let body: NewsApiResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Upstream(format!("NewsAPI response parse failed: {}", e)))?;

    if !status.is_success() || body.status != "ok" {
        let detail = body
            .message
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return Err(ApiError::Upstream(format!("NewsAPI error: {}", detail)));
    }

    info!(
        "NewsAPI returned {} of {} articles",
        body.articles.len(),
        body.total_results
    );

    let items = body.articles.into_iter().map(to_raw_item).collect();

    Ok((url.to_string(), items))
}

fn to_raw_item(article: NewsApiArticle) -> RawArticleItem {
    RawArticleItem {
        title: article.title,
        link: article.url,
        description: article.description,
        content: article.content,
        pub_date: article.published_at,
        source: article.source.and_then(|s| s.name),
        author: article.author,
    }
}
