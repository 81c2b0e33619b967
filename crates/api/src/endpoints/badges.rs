//! Badge endpoints.

use axum::{Json, Router, extract::State, routing::post};
use communityfix_common::AppResult;
use communityfix_db::entities::badge::{BadgeType, Model as BadgeModel};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Badge response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResponse {
    pub id: String,
    pub user_id: String,
    pub badge_type: BadgeType,
    pub awarded_at: String,
}

impl From<BadgeModel> for BadgeResponse {
    fn from(b: BadgeModel) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            badge_type: b.badge_type,
            awarded_at: b.awarded_at.to_rfc3339(),
        }
    }
}

/// List badges request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBadgesRequest {
    /// User whose badges to list (defaults to the caller).
    pub user_id: Option<String>,
}

/// List badges awarded to a user.
async fn list_badges(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListBadgesRequest>,
) -> AppResult<ApiResponse<Vec<BadgeResponse>>> {
    let user_id = req.user_id.as_deref().unwrap_or(&user.id);

    let badges = state.badge_service.list_for_user(user_id).await?;
    Ok(ApiResponse::ok(badges.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/list", post(list_badges))
}
