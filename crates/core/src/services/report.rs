//! Report service.

use crate::services::badge::BadgeService;
use crate::services::notification::NotificationService;
use communityfix_common::{AppError, AppResult, IdGenerator};
use communityfix_db::{
    entities::report::{self, Category, ReportStatus},
    entities::user,
    repositories::{AttachmentRepository, FollowRepository, ReportRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Points awarded for submitting a report.
const POINTS_REPORT_CREATED: i32 = 10;

/// Points awarded to the owner when their report is closed.
const POINTS_REPORT_CLOSED: i32 = 20;

/// Report service for business logic.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    user_repo: UserRepository,
    follow_repo: FollowRepository,
    attachment_repo: AttachmentRepository,
    notification_service: NotificationService,
    badge_service: BadgeService,
    id_gen: IdGenerator,
}

/// Input for creating a new report.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 4000))]
    pub description: String,

    pub category: Category,

    pub latitude: f64,

    pub longitude: f64,

    /// Attachment ID of an uploaded photo (optional).
    pub attachment_id: Option<String>,
}

/// Human-readable status label for notifications and responses.
#[must_use]
pub const fn status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Open => "OPEN",
        ReportStatus::Acknowledged => "ACKNOWLEDGED",
        ReportStatus::InProgress => "IN_PROGRESS",
        ReportStatus::Closed => "CLOSED",
    }
}

/// Whether a report is visible to the given viewer.
///
/// Hidden reports are visible only to their owner and admins; everyone else
/// must not be able to tell they exist.
#[must_use]
pub fn is_visible_to(report: &report::Model, viewer: Option<&user::Model>) -> bool {
    if !report.is_hidden {
        return true;
    }
    viewer.is_some_and(|u| u.is_admin || u.id == report.user_id)
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        user_repo: UserRepository,
        follow_repo: FollowRepository,
        attachment_repo: AttachmentRepository,
        notification_service: NotificationService,
        badge_service: BadgeService,
    ) -> Self {
        Self {
            report_repo,
            user_repo,
            follow_repo,
            attachment_repo,
            notification_service,
            badge_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new report.
    pub async fn create(&self, user_id: &str, input: CreateReportInput) -> AppResult<report::Model> {
        input.validate()?;

        if input.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if input.description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }
        if !(-90.0..=90.0).contains(&input.latitude) {
            return Err(AppError::Validation(
                "Latitude must be between -90 and 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&input.longitude) {
            return Err(AppError::Validation(
                "Longitude must be between -180 and 180".to_string(),
            ));
        }

        // Resolve the attached photo, if any
        let image_url = if let Some(ref attachment_id) = input.attachment_id {
            let attachment = self.attachment_repo.get_by_id(attachment_id).await?;
            if attachment.user_id != user_id {
                return Err(AppError::Forbidden(
                    "Attachment belongs to another user".to_string(),
                ));
            }
            Some(attachment.url)
        } else {
            None
        };

        let report_id = self.id_gen.generate();

        let model = report::ActiveModel {
            id: Set(report_id.clone()),
            user_id: Set(user_id.to_string()),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            category: Set(input.category),
            status: Set(ReportStatus::Open),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            image_url: Set(image_url),
            is_hidden: Set(false),
            comments_count: Set(0),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let report = self.report_repo.create(model).await?;
        tracing::debug!(report_id = %report.id, user_id = %user_id, "Created report");

        // Update activity counters
        self.user_repo.increment_reports_count(user_id).await?;
        self.user_repo
            .add_points(user_id, POINTS_REPORT_CREATED)
            .await?;

        // First report may cross a badge threshold
        if let Err(e) = self.badge_service.evaluate(user_id).await {
            tracing::warn!(error = %e, user_id = %user_id, "Badge evaluation failed");
        }

        Ok(report)
    }

    /// Get a report by ID, honoring visibility.
    pub async fn get(
        &self,
        report_id: &str,
        viewer: Option<&user::Model>,
    ) -> AppResult<report::Model> {
        let report = self.report_repo.get_by_id(report_id).await?;
        if !is_visible_to(&report, viewer) {
            return Err(AppError::ReportNotFound(report_id.to_string()));
        }
        Ok(report)
    }

    /// Get the feed (newest-first). Admins also see hidden reports.
    pub async fn feed(
        &self,
        viewer: Option<&user::Model>,
        category: Option<Category>,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<report::Model>> {
        let include_hidden = viewer.is_some_and(|u| u.is_admin);
        self.report_repo
            .find_feed(include_hidden, category, limit, until_id)
            .await
    }

    /// Get reports created by a user.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_user(user_id, limit, until_id).await
    }

    /// Update a report's status.
    ///
    /// Only the report owner or an admin may change status. Every transition
    /// between the four values is accepted, including reopening a closed
    /// report.
    pub async fn update_status(
        &self,
        report_id: &str,
        new_status: ReportStatus,
        caller: &user::Model,
    ) -> AppResult<report::Model> {
        let report = self.report_repo.get_by_id(report_id).await?;

        if report.user_id != caller.id && !caller.is_admin {
            return Err(AppError::Forbidden(
                "Only the report owner or an admin can change status".to_string(),
            ));
        }

        let owner_id = report.user_id.clone();
        let title = report.title.clone();

        let mut active: report::ActiveModel = report.into();
        active.status = Set(new_status);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        let report = self.report_repo.update(active).await?;

        tracing::debug!(
            report_id = %report.id,
            status = status_label(new_status),
            caller = %caller.id,
            "Updated report status"
        );

        // Fan out to the owner and every follower, excluding the caller
        self.notify_status_change(&report.id, &owner_id, &title, new_status, &caller.id)
            .await;

        // Closing a report may cross the owner's Resolver threshold
        if new_status == ReportStatus::Closed {
            self.user_repo
                .add_points(&owner_id, POINTS_REPORT_CLOSED)
                .await?;
            if let Err(e) = self.badge_service.evaluate(&owner_id).await {
                tracing::warn!(error = %e, user_id = %owner_id, "Badge evaluation failed");
            }
        }

        Ok(report)
    }

    /// Notify the owner and followers about a status change.
    async fn notify_status_change(
        &self,
        report_id: &str,
        owner_id: &str,
        title: &str,
        new_status: ReportStatus,
        actor_id: &str,
    ) {
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
            if recipient == actor_id {
                continue;
            }
            if let Err(e) = self
                .notification_service
                .create_status_change_notification(
                    &recipient,
                    actor_id,
                    report_id,
                    title,
                    status_label(new_status),
                )
                .await
            {
                tracing::warn!(error = %e, recipient = %recipient, "Failed to create status notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

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

    fn test_report(id: &str, user_id: &str, is_hidden: bool) -> report::Model {
        report::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Broken streetlight".to_string(),
            description: "Dark corner at night".to_string(),
            category: Category::Safety,
            status: ReportStatus::Open,
            latitude: 3.1390,
            longitude: 101.6869,
            image_url: None,
            is_hidden,
            comments_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_visible_report_is_visible_to_everyone() {
        let report = test_report("r1", "u1", false);
        assert!(is_visible_to(&report, None));
        assert!(is_visible_to(&report, Some(&test_user("u2", false))));
    }

    #[test]
    fn test_hidden_report_invisible_to_others() {
        let report = test_report("r1", "u1", true);
        assert!(!is_visible_to(&report, None));
        assert!(!is_visible_to(&report, Some(&test_user("u2", false))));
    }

    #[test]
    fn test_hidden_report_visible_to_owner_and_admin() {
        let report = test_report("r1", "u1", true);
        assert!(is_visible_to(&report, Some(&test_user("u1", false))));
        assert!(is_visible_to(&report, Some(&test_user("admin", true))));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(ReportStatus::Open), "OPEN");
        assert_eq!(status_label(ReportStatus::Acknowledged), "ACKNOWLEDGED");
        assert_eq!(status_label(ReportStatus::InProgress), "IN_PROGRESS");
        assert_eq!(status_label(ReportStatus::Closed), "CLOSED");
    }
}
