//! Comment service.

use crate::services::badge::BadgeService;
use crate::services::notification::NotificationService;
use crate::services::report::is_visible_to;
use communityfix_common::{AppError, AppResult, IdGenerator};
use communityfix_db::{
    entities::{comment, user},
    repositories::{CommentRepository, FollowRepository, ReportRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Points awarded for posting a comment.
const POINTS_COMMENT_CREATED: i32 = 2;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    report_repo: ReportRepository,
    user_repo: UserRepository,
    follow_repo: FollowRepository,
    notification_service: NotificationService,
    badge_service: BadgeService,
    id_gen: IdGenerator,
}

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub report_id: String,

    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        report_repo: ReportRepository,
        user_repo: UserRepository,
        follow_repo: FollowRepository,
        notification_service: NotificationService,
        badge_service: BadgeService,
    ) -> Self {
        Self {
            comment_repo,
            report_repo,
            user_repo,
            follow_repo,
            notification_service,
            badge_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a comment to a report.
    ///
    /// Comments are immutable once created.
    pub async fn create(
        &self,
        author: &user::Model,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let text = input.text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Comment text is required".to_string()));
        }

        let report = self.report_repo.get_by_id(&input.report_id).await?;
        if !is_visible_to(&report, Some(author)) {
            return Err(AppError::ReportNotFound(input.report_id.clone()));
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            report_id: Set(report.id.clone()),
            user_id: Set(author.id.clone()),
            text: Set(text.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let comment = self.comment_repo.create(model).await?;
        tracing::debug!(comment_id = %comment.id, report_id = %report.id, "Created comment");

        // Update activity counters
        self.report_repo.increment_comments_count(&report.id).await?;
        self.user_repo.increment_comments_count(&author.id).await?;
        self.user_repo
            .add_points(&author.id, POINTS_COMMENT_CREATED)
            .await?;

        // Fan out to the report owner and every other follower
        self.notify_comment(&report.id, &report.user_id, &report.title, author)
            .await;

        // Fifth comment may cross the Helper threshold
        if let Err(e) = self.badge_service.evaluate(&author.id).await {
            tracing::warn!(error = %e, user_id = %author.id, "Badge evaluation failed");
        }

        Ok(comment)
    }

    /// Notify the owner and followers about a new comment.
    async fn notify_comment(
        &self,
        report_id: &str,
        owner_id: &str,
        title: &str,
        author: &user::Model,
    ) {
        let author_name = author.name.as_deref().unwrap_or(&author.username);

        let mut recipients = vec![owner_id.to_string()];
        match self.follow_repo.find_by_report(report_id).await {
            Ok(follows) => {
                recipients.extend(follows.into_iter().map(|f| f.user_id));
            }
            Err(e) => {
                tracing::warn!(error = %e, report_id = %report_id, "Failed to load followers");
            }
        }
        recipients.sort_unstable();
        recipients.dedup();

        for recipient in recipients {
            if recipient == author.id {
                continue;
            }
            if let Err(e) = self
                .notification_service
                .create_comment_notification(&recipient, &author.id, author_name, report_id, title)
                .await
            {
                tracing::warn!(error = %e, recipient = %recipient, "Failed to create comment notification");
            }
        }
    }

    /// Get comments on a report (newest-first).
    pub async fn list(
        &self,
        report_id: &str,
        viewer: Option<&user::Model>,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<comment::Model>> {
        let report = self.report_repo.get_by_id(report_id).await?;
        if !is_visible_to(&report, viewer) {
            return Err(AppError::ReportNotFound(report_id.to_string()));
        }

        self.comment_repo
            .find_by_report(report_id, limit, until_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use communityfix_db::repositories::BadgeRepository;
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

    fn empty_service() -> CommentService {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let notification_service = crate::services::NotificationService::new(
            communityfix_db::repositories::NotificationRepository::new(Arc::clone(&db)),
        );
        let badge_service = crate::services::BadgeService::new(
            BadgeRepository::new(Arc::clone(&db)),
            ReportRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            notification_service.clone(),
        );
        CommentService::new(
            CommentRepository::new(Arc::clone(&db)),
            ReportRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            FollowRepository::new(Arc::clone(&db)),
            notification_service,
            badge_service,
        )
    }

    #[tokio::test]
    async fn test_empty_comment_is_rejected() {
        let service = empty_service();

        let input = CreateCommentInput {
            report_id: "r1".to_string(),
            text: "   ".to_string(),
        };

        // Whitespace-only text fails before any database access
        let result = service.create(&test_user("u1"), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
