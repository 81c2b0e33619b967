//! Follow service.

use crate::services::report::is_visible_to;
use communityfix_common::{AppError, AppResult, IdGenerator};
use communityfix_db::{
    entities::{follow, report, user},
    repositories::{FollowRepository, ReportRepository},
};
use sea_orm::Set;

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    report_repo: ReportRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, report_repo: ReportRepository) -> Self {
        Self {
            follow_repo,
            report_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a report.
    ///
    /// Idempotent: following a report twice leaves exactly one relationship
    /// row and succeeds both times.
    pub async fn follow(&self, report_id: &str, viewer: &user::Model) -> AppResult<()> {
        let report = self.report_repo.get_by_id(report_id).await?;
        if !is_visible_to(&report, Some(viewer)) {
            return Err(AppError::ReportNotFound(report_id.to_string()));
        }

        if self.follow_repo.is_following(report_id, &viewer.id).await? {
            return Ok(());
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            report_id: Set(report_id.to_string()),
            user_id: Set(viewer.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        match self.follow_repo.create(model).await {
            Ok(_) => Ok(()),
            // A concurrent follow can beat us to the unique index; the intent
            // ("be following") is satisfied either way.
            Err(e) => {
                if self.follow_repo.is_following(report_id, &viewer.id).await? {
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Unfollow a report. Removing an absent follow is a no-op.
    pub async fn unfollow(&self, report_id: &str, user_id: &str) -> AppResult<()> {
        self.follow_repo.delete_by_pair(report_id, user_id).await
    }

    /// Check whether a user follows a report.
    pub async fn is_following(&self, report_id: &str, user_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(report_id, user_id).await
    }

    /// Count followers of a report. Recomputed on demand.
    pub async fn follower_count(&self, report_id: &str) -> AppResult<u64> {
        self.follow_repo.count_for_report(report_id).await
    }

    /// Get the reports a user follows (newest-first).
    ///
    /// Hidden reports are filtered out unless the viewer may see them.
    pub async fn list_followed(
        &self,
        viewer: &user::Model,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<report::Model>> {
        let follows = self
            .follow_repo
            .find_by_user(&viewer.id, limit, until_id)
            .await?;

        let ids: Vec<String> = follows.into_iter().map(|f| f.report_id).collect();
        let mut reports = self.report_repo.find_by_ids(&ids).await?;
        reports.retain(|r| is_visible_to(r, Some(viewer)));
        reports.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(reports)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use communityfix_db::entities::report::{Category, ReportStatus};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str) -> user::Model {
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
            is_admin: false,
            is_banned: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_report(id: &str, user_id: &str) -> report::Model {
        report::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Deep Pothole".to_string(),
            description: "Large pothole on the main road".to_string(),
            category: Category::Infrastructure,
            status: ReportStatus::Open,
            latitude: 3.1390,
            longitude: 101.6869,
            image_url: None,
            is_hidden: false,
            comments_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_follow(id: &str, report_id: &str, user_id: &str) -> follow::Model {
        follow::Model {
            id: id.to_string(),
            report_id: report_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_follow_is_idempotent() {
        // The report lookup succeeds, then the pair lookup finds an existing
        // row; no insert must be attempted (the mock has no exec results, so
        // an attempted insert would error).
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_report("r1", "owner")]])
            .append_query_results([vec![test_follow("f1", "r1", "u1")]])
            .into_connection();
        let db = Arc::new(db);

        let service = FollowService::new(
            FollowRepository::new(Arc::clone(&db)),
            ReportRepository::new(db),
        );

        let result = service.follow("r1", &test_user("u1")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_follow_hidden_report_is_not_found() {
        let mut report = test_report("r1", "owner");
        report.is_hidden = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![report]])
            .into_connection();
        let db = Arc::new(db);

        let service = FollowService::new(
            FollowRepository::new(Arc::clone(&db)),
            ReportRepository::new(db),
        );

        let result = service.follow("r1", &test_user("u1")).await;
        assert!(matches!(result, Err(AppError::ReportNotFound(_))));
    }
}
