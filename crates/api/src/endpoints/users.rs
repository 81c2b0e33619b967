//! User endpoints.

use axum::{Json, Router, extract::State, routing::post};
use communityfix_common::AppResult;
use communityfix_core::UpdateUserInput;
use communityfix_db::entities::user::Model as UserModel;
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::badges::BadgeResponse, extractors::AuthUser, middleware::AppState,
    response::ApiResponse,
};

/// User response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub points: i32,
    pub reports_count: i32,
    pub comments_count: i32,
    pub is_admin: bool,
    pub is_banned: bool,
    pub created_at: String,
}

impl From<UserModel> for UserResponse {
    fn from(u: UserModel) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            avatar_url: u.avatar_url,
            points: u.points,
            reports_count: u.reports_count,
            comments_count: u.comments_count,
            is_admin: u.is_admin,
            is_banned: u.is_banned,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Get the authenticated user.
async fn me(AuthUser(user): AuthUser) -> AppResult<ApiResponse<UserResponse>> {
    Ok(ApiResponse::ok(user.into()))
}

/// Update profile request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    /// Attachment ID of an uploaded avatar image.
    pub avatar_attachment_id: Option<String>,
}

/// Update the authenticated user's profile.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    // Resolve avatar attachment to its public URL
    let avatar_url = if let Some(ref attachment_id) = req.avatar_attachment_id {
        let attachment = state.upload_service.get(attachment_id).await?;
        if attachment.user_id != user.id {
            return Err(communityfix_common::AppError::Forbidden(
                "Attachment belongs to another user".to_string(),
            ));
        }
        Some(attachment.url)
    } else {
        None
    };

    let input = UpdateUserInput {
        name: req.name,
        avatar_url,
    };

    let user = state.user_service.update(&user.id, input).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Show user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowUserRequest {
    pub user_id: String,
}

/// Profile response: user plus their badge case.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub badges: Vec<BadgeResponse>,
}

/// Get a user's public profile with badges.
async fn show_user(
    State(state): State<AppState>,
    Json(req): Json<ShowUserRequest>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let user = state.user_service.get(&req.user_id).await?;
    let badges = state.badge_service.list_for_user(&user.id).await?;

    Ok(ApiResponse::ok(ProfileResponse {
        user: user.into(),
        badges: badges.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", post(me))
        .route("/update", post(update_profile))
        .route("/show", post(show_user))
}
