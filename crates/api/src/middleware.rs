//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use communityfix_common::AppError;
use communityfix_core::{
    BadgeService, CommentService, FollowService, ModerationService, NotificationService,
    ReportService, UploadService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub report_service: ReportService,
    pub follow_service: FollowService,
    pub comment_service: CommentService,
    pub notification_service: NotificationService,
    pub badge_service: BadgeService,
    pub moderation_service: ModerationService,
    pub upload_service: UploadService,
}

/// Authentication middleware.
///
/// Resolves a bearer token into a user model in the request extensions.
/// Requests without a token pass through unauthenticated; endpoints that
/// require auth reject via the `AuthUser` extractor. Banned accounts are
/// rejected here instead of falling through to anonymous access.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e @ AppError::Forbidden(_)) => return e.into_response(),
            Err(_) => {}
        }
    }

    next.run(req).await
}
