//! Follow endpoints.

use axum::{Json, Router, extract::State, routing::post};
use communityfix_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::reports::ReportResponse,
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

const fn default_limit() -> u64 {
    10
}

/// Follow/unfollow request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub report_id: String,
}

/// Follow state response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStateResponse {
    pub following: bool,
    pub followers_count: u64,
}

/// Follow a report. Idempotent.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowStateResponse>> {
    state.follow_service.follow(&req.report_id, &user).await?;

    let followers_count = state.follow_service.follower_count(&req.report_id).await?;
    Ok(ApiResponse::ok(FollowStateResponse {
        following: true,
        followers_count,
    }))
}

/// Unfollow a report. Removing an absent follow is a no-op.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowStateResponse>> {
    state
        .follow_service
        .unfollow(&req.report_id, &user.id)
        .await?;

    let followers_count = state.follow_service.follower_count(&req.report_id).await?;
    Ok(ApiResponse::ok(FollowStateResponse {
        following: false,
        followers_count,
    }))
}

/// Get the viewer's follow state for a report.
async fn follow_state(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowStateResponse>> {
    let following = if let Some(ref viewer) = viewer {
        state
            .follow_service
            .is_following(&req.report_id, &viewer.id)
            .await?
    } else {
        false
    };

    let followers_count = state.follow_service.follower_count(&req.report_id).await?;
    Ok(ApiResponse::ok(FollowStateResponse {
        following,
        followers_count,
    }))
}

/// List followed reports request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFollowedRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// Get the reports the authenticated user follows.
async fn list_followed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListFollowedRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let limit = req.limit.min(100);

    let reports = state
        .follow_service
        .list_followed(&user, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(reports.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/follow", post(follow))
        .route("/unfollow", post(unfollow))
        .route("/state", post(follow_state))
        .route("/list", post(list_followed))
}
