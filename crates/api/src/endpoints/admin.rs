//! Admin endpoints (report visibility, user bans).
//!
//! Admin privilege is verified in the moderation service, not here.

use axum::{Json, Router, extract::State, routing::post};
use communityfix_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::reports::ReportResponse, endpoints::users::UserResponse, extractors::AuthUser,
    middleware::AppState, response::ApiResponse,
};

const fn default_limit() -> u64 {
    10
}

/// List request with offset pagination (admin dashboard tables).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminListRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Get all reports including hidden ones.
async fn list_reports(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AdminListRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let limit = req.limit.min(100);

    let reports = state
        .moderation_service
        .list_all_reports(&user.id, limit, req.offset)
        .await?;

    Ok(ApiResponse::ok(reports.into_iter().map(Into::into).collect()))
}

/// Set visibility request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetVisibilityRequest {
    pub report_id: String,
    pub hidden: bool,
}

/// Hide or unhide a report.
async fn set_visibility(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SetVisibilityRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .moderation_service
        .set_report_visibility(&user.id, &req.report_id, req.hidden)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Get all users.
async fn list_users(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AdminListRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let limit = req.limit.min(100);

    let users = state
        .moderation_service
        .list_users(&user.id, limit, req.offset)
        .await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Set banned request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBannedRequest {
    pub user_id: String,
    pub banned: bool,
}

/// Ban or unban a user.
async fn set_banned(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SetBannedRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let target = state
        .moderation_service
        .set_user_banned(&user.id, &req.user_id, req.banned)
        .await?;

    Ok(ApiResponse::ok(target.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", post(list_reports))
        .route("/set-visibility", post(set_visibility))
        .route("/users", post(list_users))
        .route("/set-banned", post(set_banned))
}
