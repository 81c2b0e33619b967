//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together, backed by
//! a mock database connection.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use communityfix_api::{middleware::AppState, router as api_router};
use communityfix_common::storage::LocalStorage;
use communityfix_core::{
    BadgeService, CommentService, FollowService, ModerationService, NotificationService,
    ReportService, UploadService, UserService,
};
use communityfix_db::entities::report;
use communityfix_db::repositories::{
    AttachmentRepository, BadgeRepository, CommentRepository, FollowRepository,
    NotificationRepository, ReportRepository, UserProfileRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a mock database connection.
fn create_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection()
}

/// Create a mock database connection with query results.
fn create_mock_db_with_reports(reports: Vec<report::Model>) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([reports])
        .into_connection()
}

/// Create test app state over the given connection.
fn create_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let user_profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let badge_repo = BadgeRepository::new(Arc::clone(&db));
    let attachment_repo = AttachmentRepository::new(Arc::clone(&db));

    let user_service = UserService::new(user_repo.clone(), user_profile_repo.clone());
    let notification_service = NotificationService::new(notification_repo.clone());
    let badge_service = BadgeService::new(
        badge_repo.clone(),
        report_repo.clone(),
        user_repo.clone(),
        notification_service.clone(),
    );
    let report_service = ReportService::new(
        report_repo.clone(),
        user_repo.clone(),
        follow_repo.clone(),
        attachment_repo.clone(),
        notification_service.clone(),
        badge_service.clone(),
    );
    let follow_service = FollowService::new(follow_repo.clone(), report_repo.clone());
    let comment_service = CommentService::new(
        comment_repo,
        report_repo.clone(),
        user_repo.clone(),
        follow_repo,
        notification_service.clone(),
        badge_service.clone(),
    );
    let moderation_service = ModerationService::new(report_repo, user_repo);
    let upload_service = UploadService::new(
        attachment_repo,
        Arc::new(LocalStorage::new(
            PathBuf::from("/tmp/communityfix-test"),
            "/files".to_string(),
        )),
    );

    AppState {
        user_service,
        report_service,
        follow_service,
        comment_service,
        notification_service,
        badge_service,
        moderation_service,
        upload_service,
    }
}

fn create_app(state: AppState) -> Router {
    api_router().with_state(state)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_me_requires_auth() {
    let app = create_app(create_state(create_mock_db()));

    let response = app
        .oneshot(post_json("/users/me", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_notifications_require_auth() {
    let app = create_app(create_state(create_mock_db()));

    let response = app
        .oneshot(post_json("/notifications", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_report_requires_auth() {
    let app = create_app(create_state(create_mock_db()));

    let body = r#"{"title":"Pothole","description":"Deep","category":"infrastructure","latitude":3.1,"longitude":101.7}"#;
    let response = app
        .oneshot(post_json("/reports/create", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let app = create_app(create_state(create_mock_db()));

    let body = r#"{"username":"alice","password":"short"}"#;
    let response = app.oneshot(post_json("/signup", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feed_is_public() {
    let app = create_app(create_state(create_mock_db_with_reports(Vec::new())));

    let response = app
        .oneshot(post_json("/reports/feed", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_feed_rejects_invalid_category() {
    let app = create_app(create_state(create_mock_db()));

    let body = r#"{"category":"volcanoes"}"#;
    let response = app
        .oneshot(post_json("/reports/feed", body))
        .await
        .unwrap();

    // Unknown enum value fails deserialization
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_status_rejects_invalid_status() {
    let app = create_app(create_state(create_mock_db()));

    let body = r#"{"reportId":"r1","status":"DONE"}"#;
    let response = app
        .oneshot(post_json("/reports/update-status", body))
        .await
        .unwrap();

    // Status outside the four enum values never reaches the service
    assert_ne!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_app(create_state(create_mock_db()));

    let response = app
        .oneshot(post_json("/reports/delete", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
