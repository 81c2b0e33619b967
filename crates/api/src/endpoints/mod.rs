//! API endpoints.

mod admin;
mod auth;
mod badges;
mod comments;
mod follows;
mod notifications;
mod reports;
mod uploads;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/reports", reports::router())
        .nest("/reports/comments", comments::router())
        .nest("/reports/follows", follows::router())
        .nest("/notifications", notifications::router())
        .nest("/badges", badges::router())
        .nest("/users", users::router())
        .nest("/uploads", uploads::router())
        .nest("/admin", admin::router())
}
