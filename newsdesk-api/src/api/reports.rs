//! Reporting endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::time::Instant;

use crate::error::ApiResult;
use crate::models::ReportArticleView;
use crate::services::reports;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ApprovedArticlesResponse {
    pub count: usize,
    pub elapsed_seconds: f64,
    pub articles: Vec<ReportArticleView>,
}

/// GET /analysis/approved-articles
pub async fn approved_articles(
    State(state): State<AppState>,
) -> ApiResult<Json<ApprovedArticlesResponse>> {
    let started = Instant::now();
    let articles = reports::approved_articles_report(&state.db).await?;

    Ok(Json(ApprovedArticlesResponse {
        count: articles.len(),
        elapsed_seconds: started.elapsed().as_secs_f64(),
        articles,
    }))
}

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/analysis/approved-articles", get(approved_articles))
}
