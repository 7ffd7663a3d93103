//! Ingestion endpoints
//!
//! One POST route per aggregator. Each handler validates and sanitizes the
//! keyword fields, fetches from the aggregator, records an `ingest_requests`
//! row, and hands the normalized batch to the ingestion pipeline. Google
//! News additionally gets a fetch-only route and a save route, so a caller
//! can review a feed batch before committing it.

use axum::{extract::State, routing::post, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::db::{requests, sources};
use crate::error::{ApiError, ApiResult};
use crate::models::{IngestOutcome, IngestProvenance, QueryTerms, RawArticleItem};
use crate::services::aggregators::{self, gnews, google_rss, newsapi, query};
use crate::services::{ingest, sanitize};
use crate::AppState;
use newsdesk_common::db::{SOURCE_GNEWS, SOURCE_GOOGLE_RSS, SOURCE_NEWSAPI};

/// Keyword and date fields shared by the ingestion endpoints. The term
/// fields are comma-separated lists.
#[derive(Debug, Default, Deserialize)]
pub struct IngestRequestBody {
    #[serde(default)]
    pub and_terms: String,
    #[serde(default)]
    pub or_terms: String,
    #[serde(default)]
    pub not_terms: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub max: Option<u32>,
    /// Trailing window for the Google News feed, e.g. "30d"
    #[serde(default)]
    pub time_range: Option<String>,
}

/// Sanitized and validated form of an ingestion request
struct ValidatedQuery {
    built: query::BuiltQuery,
    terms: QueryTerms,
    start_date: Option<String>,
    end_date: Option<String>,
}

fn validate_query(body: &IngestRequestBody) -> Result<ValidatedQuery, ApiError> {
    let built = query::build_query(
        &sanitize::sanitize_text(&body.and_terms),
        &sanitize::sanitize_text(&body.or_terms),
        &sanitize::sanitize_text(&body.not_terms),
    );
    if built.and_terms.is_empty() && built.or_terms.is_empty() {
        return Err(ApiError::Validation(
            "At least one AND or OR search term is required".to_string(),
        ));
    }

    let start_date = validate_date("start_date", body.start_date.as_deref())?;
    let end_date = validate_date("end_date", body.end_date.as_deref())?;

    let terms = QueryTerms {
        and_terms: built.and_terms.clone(),
        or_terms: built.or_terms.clone(),
        not_terms: built.not_terms.clone(),
    };

    Ok(ValidatedQuery {
        built,
        terms,
        start_date,
        end_date,
    })
}

fn validate_date(field: &str, value: Option<&str>) -> Result<Option<String>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ApiError::Validation(format!("{} must be a YYYY-MM-DD date, got '{}'", field, raw))
            })?;
            Ok(Some(raw.to_string()))
        }
    }
}

/// Secrets must not reach the ingest_requests table
fn redact(url: &str, secret: &str) -> String {
    url.replace(secret, "REDACTED")
}

/// Record the failed fetch attempt, then surface the fetch error. A failure
/// while recording is logged and swallowed so the original error wins.
async fn record_fetch_failure(state: &AppState, source_id: i64, terms: &QueryTerms) {
    if let Err(err) = requests::create_request(&state.db, source_id, terms, None, 0, "error").await
    {
        warn!("Failed to record errored ingest request: {}", err);
    }
}

/// POST /ingest/news-api
pub async fn ingest_newsapi(
    State(state): State<AppState>,
    Json(body): Json<IngestRequestBody>,
) -> ApiResult<Json<IngestOutcome>> {
    let validated = validate_query(&body)?;
    let api_key = state.config.newsapi_key.clone().ok_or_else(|| {
        ApiError::Other(anyhow::anyhow!("NewsAPI key is not configured"))
    })?;

    let source_id = sources::ensure_source(&state.db, SOURCE_NEWSAPI, true, false).await?;
    let client = aggregators::http_client();

    let fetched = newsapi::fetch_articles(
        &client,
        &api_key,
        &validated.built.query,
        validated.start_date.as_deref(),
        validated.end_date.as_deref(),
        body.max,
    )
    .await;

    let (url, items) = match fetched {
        Ok(result) => result,
        Err(err) => {
            record_fetch_failure(&state, source_id, &validated.terms).await;
            return Err(err);
        }
    };

    let request_url = redact(&url, &api_key);
    let request_id = requests::create_request(
        &state.db,
        source_id,
        &validated.terms,
        Some(&request_url),
        items.len(),
        "success",
    )
    .await?;

    let outcome = ingest::ingest_batch(
        &state.db,
        &items,
        IngestProvenance {
            source_id,
            request_id,
        },
    )
    .await?;

    Ok(Json(outcome))
}

/// POST /ingest/gnews
pub async fn ingest_gnews(
    State(state): State<AppState>,
    Json(body): Json<IngestRequestBody>,
) -> ApiResult<Json<IngestOutcome>> {
    let validated = validate_query(&body)?;
    let api_key = state.config.gnews_key.clone().ok_or_else(|| {
        ApiError::Other(anyhow::anyhow!("GNews key is not configured"))
    })?;

    let source_id = sources::ensure_source(&state.db, SOURCE_GNEWS, true, false).await?;
    let client = aggregators::http_client();

    let fetched = gnews::fetch_articles(
        &client,
        &api_key,
        &validated.built.query,
        validated.start_date.as_deref(),
        validated.end_date.as_deref(),
        body.max,
    )
    .await;

    let (url, items) = match fetched {
        Ok(result) => result,
        Err(err) => {
            record_fetch_failure(&state, source_id, &validated.terms).await;
            return Err(err);
        }
    };

    let request_url = redact(&url, &api_key);
    let request_id = requests::create_request(
        &state.db,
        source_id,
        &validated.terms,
        Some(&request_url),
        items.len(),
        "success",
    )
    .await?;

    let outcome = ingest::ingest_batch(
        &state.db,
        &items,
        IngestProvenance {
            source_id,
            request_id,
        },
    )
    .await?;

    Ok(Json(outcome))
}

/// POST /ingest/google-rss
pub async fn ingest_google_rss(
    State(state): State<AppState>,
    Json(body): Json<IngestRequestBody>,
) -> ApiResult<Json<IngestOutcome>> {
    let validated = validate_query(&body)?;
    let (time_range, invalid) =
        query::normalize_time_range(body.time_range.as_deref().unwrap_or(""));
    if invalid {
        warn!("Invalid time_range, falling back to {}", time_range);
    }

    let source_id = sources::ensure_source(&state.db, SOURCE_GOOGLE_RSS, false, true).await?;
    let url = google_rss::build_rss_url(&validated.built.query, &time_range)?;
    let client = aggregators::http_client();

    let items = match google_rss::fetch_rss_items(&client, &url).await {
        Ok(items) => items,
        Err(err) => {
            record_fetch_failure(&state, source_id, &validated.terms).await;
            return Err(err);
        }
    };

    let request_id = requests::create_request(
        &state.db,
        source_id,
        &validated.terms,
        Some(&url),
        items.len(),
        "success",
    )
    .await?;

    let outcome = ingest::ingest_batch(
        &state.db,
        &items,
        IngestProvenance {
            source_id,
            request_id,
        },
    )
    .await?;

    Ok(Json(outcome))
}

/// Response of the fetch-only Google News route
#[derive(Debug, Serialize)]
pub struct RssFetchResponse {
    pub request_url: String,
    pub count: usize,
    pub items: Vec<RawArticleItem>,
}

/// POST /ingest/google-rss/fetch
///
/// Fetches and parses the feed but writes nothing; the caller reviews the
/// batch and posts it back to /ingest/google-rss/save.
pub async fn fetch_google_rss(
    State(_state): State<AppState>,
    Json(body): Json<IngestRequestBody>,
) -> ApiResult<Json<RssFetchResponse>> {
    let validated = validate_query(&body)?;
    let (time_range, invalid) =
        query::normalize_time_range(body.time_range.as_deref().unwrap_or(""));
    if invalid {
        warn!("Invalid time_range, falling back to {}", time_range);
    }

    let url = google_rss::build_rss_url(&validated.built.query, &time_range)?;
    let client = aggregators::http_client();
    let items = google_rss::fetch_rss_items(&client, &url).await?;

    Ok(Json(RssFetchResponse {
        count: items.len(),
        request_url: url,
        items,
    }))
}

/// Body of the save route: a previously fetched batch plus the terms it
/// was fetched with
#[derive(Debug, Default, Deserialize)]
pub struct RssSaveBody {
    #[serde(default)]
    pub and_terms: String,
    #[serde(default)]
    pub or_terms: String,
    #[serde(default)]
    pub not_terms: String,
    #[serde(default)]
    pub request_url: Option<String>,
    #[serde(default)]
    pub items: Vec<RawArticleItem>,
}

/// POST /ingest/google-rss/save
pub async fn save_google_rss(
    State(state): State<AppState>,
    Json(body): Json<RssSaveBody>,
) -> ApiResult<Json<IngestOutcome>> {
    if body.items.is_empty() {
        return Err(ApiError::Validation(
            "items must contain at least one article".to_string(),
        ));
    }

    let terms = QueryTerms {
        and_terms: query::split_csv(&sanitize::sanitize_text(&body.and_terms)),
        or_terms: query::split_csv(&sanitize::sanitize_text(&body.or_terms)),
        not_terms: query::split_csv(&sanitize::sanitize_text(&body.not_terms)),
    };

    let source_id = sources::ensure_source(&state.db, SOURCE_GOOGLE_RSS, false, true).await?;
    let request_id = requests::create_request(
        &state.db,
        source_id,
        &terms,
        body.request_url.as_deref(),
        body.items.len(),
        "success",
    )
    .await?;

    let outcome = ingest::ingest_batch(
        &state.db,
        &body.items,
        IngestProvenance {
            source_id,
            request_id,
        },
    )
    .await?;

    Ok(Json(outcome))
}

pub fn ingest_routes() -> Router<AppState> {
    Router::new()
        .route("/ingest/news-api", post(ingest_newsapi))
        .route("/ingest/gnews", post(ingest_gnews))
        .route("/ingest/google-rss", post(ingest_google_rss))
        .route("/ingest/google-rss/fetch", post(fetch_google_rss))
        .route("/ingest/google-rss/save", post(save_google_rss))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_validation_requires_a_positive_term() {
        let empty = IngestRequestBody::default();
        assert!(validate_query(&empty).is_err());

        let not_only = IngestRequestBody {
            not_terms: "sports".to_string(),
            ..Default::default()
        };
        assert!(validate_query(&not_only).is_err());

        let ok = IngestRequestBody {
            and_terms: "flood".to_string(),
            ..Default::default()
        };
        let validated = validate_query(&ok).unwrap();
        assert_eq!(validated.built.query, "flood");
    }

    #[test]
    fn date_validation_rejects_non_iso_dates() {
        assert!(validate_date("start_date", Some("08/01/2026")).is_err());
        assert_eq!(
            validate_date("start_date", Some("2026-08-01")).unwrap(),
            Some("2026-08-01".to_string())
        );
        assert_eq!(validate_date("start_date", Some("  ")).unwrap(), None);
        assert_eq!(validate_date("start_date", None).unwrap(), None);
    }

    #[test]
    fn redaction_removes_the_key() {
        let url = "https://newsapi.org/v2/everything?q=flood&apiKey=sekrit";
        assert_eq!(
            redact(url, "sekrit"),
            "https://newsapi.org/v2/everything?q=flood&apiKey=REDACTED"
        );
    }
}
