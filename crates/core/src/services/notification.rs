//! Notification service.

use communityfix_common::{AppResult, IdGenerator};
use communityfix_db::{
    entities::notification::{self, NotificationType},
    repositories::NotificationRepository,
};
use sea_orm::Set;

/// Notification service for business logic.
///
/// Listing and acknowledgement are distinct operations: fetching a user's
/// notifications never flips read flags.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a comment notification.
    ///
    /// Returns `None` when the actor is the recipient (no self-notification).
    pub async fn create_comment_notification(
        &self,
        user_id: &str,
        actor_id: &str,
        actor_name: &str,
        report_id: &str,
        report_title: &str,
    ) -> AppResult<Option<notification::Model>> {
        self.create_internal(
            user_id,
            Some(actor_id),
            NotificationType::Comment,
            &format!("{actor_name} commented on \"{report_title}\""),
            &format!("/report/{report_id}"),
        )
        .await
    }

    /// Create a status change notification.
    pub async fn create_status_change_notification(
        &self,
        user_id: &str,
        actor_id: &str,
        report_id: &str,
        report_title: &str,
        status_label: &str,
    ) -> AppResult<Option<notification::Model>> {
        self.create_internal(
            user_id,
            Some(actor_id),
            NotificationType::StatusChange,
            &format!("\"{report_title}\" is now {status_label}"),
            &format!("/report/{report_id}"),
        )
        .await
    }

    /// Create a system notification (badge awards and the like).
    pub async fn create_system_notification(
        &self,
        user_id: &str,
        message: &str,
        link: &str,
    ) -> AppResult<Option<notification::Model>> {
        self.create_internal(user_id, None, NotificationType::System, message, link)
            .await
    }

    /// Internal helper to create notifications.
    async fn create_internal(
        &self,
        user_id: &str,
        actor_id: Option<&str>,
        notification_type: NotificationType,
        message: &str,
        link: &str,
    ) -> AppResult<Option<notification::Model>> {
        // Don't notify yourself
        if actor_id == Some(user_id) {
            return Ok(None);
        }

        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            actor_id: Set(actor_id.map(std::string::ToString::to_string)),
            notification_type: Set(notification_type),
            message: Set(message.to_string()),
            link: Set(link.to_string()),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        let notification = self.notification_repo.create(model).await?;
        Ok(Some(notification))
    }

    /// Get notifications for a user (newest-first).
    pub async fn list(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_user(user_id, limit, until_id, unread_only)
            .await
    }

    /// Mark a notification as read.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        // Verify the notification belongs to the user
        let notification = self.notification_repo.find_by_id(notification_id).await?;
        if let Some(n) = notification
            && n.user_id == user_id
        {
            self.notification_repo.mark_as_read(notification_id).await?;
        }
        Ok(())
    }

    /// Mark all notifications as read for a user.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_no_self_notification() {
        // No query results appended: a self-notification must short-circuit
        // before touching the database.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );
        let service = NotificationService::new(NotificationRepository::new(db));

        let result = service
            .create_comment_notification("u1", "u1", "alice", "r1", "Pothole")
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
