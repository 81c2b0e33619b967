//! Moderation service for the admin dashboard.

use communityfix_common::{AppError, AppResult};
use communityfix_db::{
    entities::{report, user},
    repositories::{ReportRepository, UserRepository},
};
use sea_orm::Set;

/// Moderation service for report visibility and user bans.
#[derive(Clone)]
pub struct ModerationService {
    report_repo: ReportRepository,
    user_repo: UserRepository,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(report_repo: ReportRepository, user_repo: UserRepository) -> Self {
        Self {
            report_repo,
            user_repo,
        }
    }

    /// Require that the caller is an admin.
    async fn require_admin(&self, caller_id: &str) -> AppResult<user::Model> {
        let caller = self.user_repo.get_by_id(caller_id).await?;
        if !caller.is_admin {
            return Err(AppError::Forbidden(
                "Only admins can perform this action".to_string(),
            ));
        }
        Ok(caller)
    }

    // ========== Report visibility ==========

    /// Hide or unhide a report. Status is untouched.
    pub async fn set_report_visibility(
        &self,
        caller_id: &str,
        report_id: &str,
        hidden: bool,
    ) -> AppResult<report::Model> {
        self.require_admin(caller_id).await?;

        let report = self.report_repo.get_by_id(report_id).await?;

        let mut active: report::ActiveModel = report.into();
        active.is_hidden = Set(hidden);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        let report = self.report_repo.update(active).await?;

        tracing::info!(
            report_id = %report.id,
            hidden = hidden,
            moderator = %caller_id,
            "Changed report visibility"
        );

        Ok(report)
    }

    /// Get all reports including hidden ones (admin dashboard).
    pub async fn list_all_reports(
        &self,
        caller_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.require_admin(caller_id).await?;
        self.report_repo.find_all(limit, offset).await
    }

    // ========== User bans ==========

    /// Ban or unban a user.
    pub async fn set_user_banned(
        &self,
        caller_id: &str,
        user_id: &str,
        banned: bool,
    ) -> AppResult<user::Model> {
        self.require_admin(caller_id).await?;

        // Can't ban yourself
        if caller_id == user_id {
            return Err(AppError::BadRequest("Cannot ban yourself".to_string()));
        }

        let target = self.user_repo.get_by_id(user_id).await?;

        // Can't ban admins
        if target.is_admin {
            return Err(AppError::Forbidden("Cannot ban an admin".to_string()));
        }

        let mut active: user::ActiveModel = target.into();
        active.is_banned = Set(banned);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        let user = self.user_repo.update(active).await?;

        tracing::info!(
            user_id = %user.id,
            banned = banned,
            moderator = %caller_id,
            "Changed user ban state"
        );

        Ok(user)
    }

    /// List all users ordered by username (admin dashboard).
    pub async fn list_users(
        &self,
        caller_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.require_admin(caller_id).await?;
        self.user_repo.list(limit, offset).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: id.to_string(),
            username_lower: id.to_lowercase(),
            token: format!("token-{id}"),
            name: None,
            avatar_url: None,
            points: 0,
            reports_count: 0,
            comments_count: 0,
            is_admin,
            is_banned: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(results: Vec<Vec<user::Model>>) -> ModerationService {
        let mut mock = MockDatabase::new(DatabaseBackend::Postgres);
        for result in results {
            mock = mock.append_query_results([result]);
        }
        let db = Arc::new(mock.into_connection());
        ModerationService::new(
            ReportRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_non_admin_cannot_list_users() {
        let service = service_with(vec![vec![test_user("u1", false)]]);

        let result = service.list_users("u1", 10, 0).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_cannot_ban_yourself() {
        let service = service_with(vec![vec![test_user("admin", true)]]);

        let result = service.set_user_banned("admin", "admin", true).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_cannot_ban_an_admin() {
        let service = service_with(vec![
            vec![test_user("admin", true)],
            vec![test_user("admin2", true)],
        ]);

        let result = service.set_user_banned("admin", "admin2", true).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
