//! State-assignment analysis endpoints
//!
//! Listing of AI state assignments plus the human-verify route that drives
//! the reconciliation engine.

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::{AiProposalView, ArticleStateView, ReviewAction, StateRef};
use crate::services::reconciliation;
use crate::services::reports;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StateAssignerBody {
    #[serde(default)]
    pub include_null_state: bool,
}

#[derive(Debug, Serialize)]
pub struct StateAssignerResponse {
    pub count: usize,
    pub articles: Vec<ArticleStateView>,
}

/// POST /analysis/state-assigner
pub async fn list_state_assignments(
    State(state): State<AppState>,
    body: Option<Json<StateAssignerBody>>,
) -> ApiResult<Json<StateAssignerResponse>> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let articles =
        reports::articles_with_state_assignments(&state.db, body.include_null_state).await?;

    Ok(Json(StateAssignerResponse {
        count: articles.len(),
        articles,
    }))
}

/// Body of the human-verify route. Both fields are validated by hand so a
/// missing or unknown value yields a validation error, not a rejection from
/// the JSON extractor.
#[derive(Debug, Deserialize)]
pub struct HumanVerifyBody {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub state_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HumanVerifyResponse {
    pub status: String,
    pub state_human_approved_array: Vec<StateRef>,
    pub state_ai_approved: Option<AiProposalView>,
}

/// POST /analysis/state-assigner/human-verify/:article_id
pub async fn human_verify(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    body: Option<Json<HumanVerifyBody>>,
) -> ApiResult<Json<HumanVerifyResponse>> {
    // A missing or unparseable body gets the same error envelope as a bad
    // field, not the extractor's plain-text rejection
    let body = body
        .map(|Json(b)| b)
        .ok_or_else(|| ApiError::Validation("A JSON body is required".to_string()))?;
    let action = body
        .action
        .as_deref()
        .ok_or_else(|| ApiError::Validation("action is required".to_string()))?;
    let action = ReviewAction::parse(action).ok_or_else(|| {
        ApiError::Validation(format!(
            "action must be 'approve' or 'reject', got '{}'",
            action
        ))
    })?;
    let state_id = body
        .state_id
        .ok_or_else(|| ApiError::Validation("state_id is required".to_string()))?;

    let detail = reconciliation::review_state(&state.db, article_id, state_id, action).await?;

    let status = match action {
        ReviewAction::Approve => "approved",
        ReviewAction::Reject => "rejected",
    };

    Ok(Json(HumanVerifyResponse {
        status: status.to_string(),
        state_human_approved_array: detail.state_human_approved_array,
        state_ai_approved: detail.state_ai_approved,
    }))
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/analysis/state-assigner", post(list_state_assignments))
        .route(
            "/analysis/state-assigner/human-verify/:article_id",
            post(human_verify),
        )
}
