//! Content-approval endpoint

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::services::content_approval;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ApproveReportBody {
    #[serde(default)]
    pub reviewer_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ApproveReportResponse {
    pub message: String,
}

/// POST /articles/:article_id/approve-report
pub async fn approve_report(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    body: Option<Json<ApproveReportBody>>,
) -> ApiResult<Json<ApproveReportResponse>> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let message =
        content_approval::approve_content(&state.db, article_id, body.reviewer_id).await?;

    Ok(Json(ApproveReportResponse { message }))
}

pub fn approval_routes() -> Router<AppState> {
    Router::new().route("/articles/:article_id/approve-report", post(approve_report))
}
