//! Report endpoints.

use axum::{Json, Router, extract::State, routing::post};
use communityfix_common::AppResult;
use communityfix_core::CreateReportInput;
use communityfix_db::entities::report::{Category, Model as ReportModel, ReportStatus};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

const fn default_limit() -> u64 {
    10
}

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub created_at: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: ReportStatus,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_hidden: bool,
    pub comments_count: i32,
}

impl From<ReportModel> for ReportResponse {
    fn from(r: ReportModel) -> Self {
        Self {
            id: r.id,
            created_at: r.created_at.to_rfc3339(),
            user_id: r.user_id,
            title: r.title,
            description: r.description,
            category: r.category,
            status: r.status,
            latitude: r.latitude,
            longitude: r.longitude,
            image_url: r.image_url,
            is_hidden: r.is_hidden,
            comments_count: r.comments_count,
        }
    }
}

/// Create report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub latitude: f64,
    pub longitude: f64,
    pub attachment_id: Option<String>,
}

/// Create a new report.
async fn create_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let input = CreateReportInput {
        title: req.title,
        description: req.description,
        category: req.category,
        latitude: req.latitude,
        longitude: req.longitude,
        attachment_id: req.attachment_id,
    };

    let report = state.report_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(report.into()))
}

/// Show report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowReportRequest {
    pub report_id: String,
}

/// Report detail response, with engagement state for the viewer.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetailResponse {
    #[serde(flatten)]
    pub report: ReportResponse,
    pub followers_count: u64,
    pub is_following: bool,
}

/// Get a single report with follower state.
async fn show_report(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowReportRequest>,
) -> AppResult<ApiResponse<ReportDetailResponse>> {
    let report = state
        .report_service
        .get(&req.report_id, viewer.as_ref())
        .await?;

    let followers_count = state.follow_service.follower_count(&report.id).await?;
    let is_following = if let Some(ref viewer) = viewer {
        state
            .follow_service
            .is_following(&report.id, &viewer.id)
            .await?
    } else {
        false
    };

    Ok(ApiResponse::ok(ReportDetailResponse {
        report: report.into(),
        followers_count,
        is_following,
    }))
}

/// Feed request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    /// Maximum results (default: 10, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Cursor for pagination (before this ID)
    pub until_id: Option<String>,
    /// Restrict to a category
    pub category: Option<Category>,
}

/// Get the report feed (newest-first).
async fn feed(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<FeedRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let limit = req.limit.min(100);

    let reports = state
        .report_service
        .feed(viewer.as_ref(), req.category, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(reports.into_iter().map(Into::into).collect()))
}

/// My reports request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyReportsRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// Get the authenticated user's reports.
async fn my_reports(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<MyReportsRequest>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let limit = req.limit.min(100);

    let reports = state
        .report_service
        .list_by_user(&user.id, limit, req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(reports.into_iter().map(Into::into).collect()))
}

/// Update status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub report_id: String,
    pub status: ReportStatus,
}

/// Update a report's status (owner or admin only).
async fn update_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .report_service
        .update_status(&req.report_id, req.status, &user)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_report))
        .route("/show", post(show_report))
        .route("/feed", post(feed))
        .route("/mine", post(my_reports))
        .route("/update-status", post(update_status))
}
