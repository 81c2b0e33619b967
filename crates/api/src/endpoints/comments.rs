//! Comment endpoints.

use axum::{Json, Router, extract::State, routing::post};
use communityfix_common::AppResult;
use communityfix_core::CreateCommentInput;
use communityfix_db::entities::comment::Model as CommentModel;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

const fn default_limit() -> u64 {
    10
}

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub created_at: String,
    pub report_id: String,
    pub user_id: String,
    pub text: String,
}

impl From<CommentModel> for CommentResponse {
    fn from(c: CommentModel) -> Self {
        Self {
            id: c.id,
            created_at: c.created_at.to_rfc3339(),
            report_id: c.report_id,
            user_id: c.user_id,
            text: c.text,
        }
    }
}

/// Create comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub report_id: String,
    pub text: String,
}

/// Add a comment to a report.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let input = CreateCommentInput {
        report_id: req.report_id,
        text: req.text,
    };

    let comment = state.comment_service.create(&user, input).await?;
    Ok(ApiResponse::ok(comment.into()))
}

/// List comments request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsRequest {
    pub report_id: String,
    /// Maximum results (default: 10, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Cursor for pagination (before this ID)
    pub until_id: Option<String>,
}

/// List comments on a report (newest-first).
async fn list_comments(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListCommentsRequest>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let limit = req.limit.min(100);

    let comments = state
        .comment_service
        .list(&req.report_id, viewer.as_ref(), limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(comments.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_comment))
        .route("/list", post(list_comments))
}
