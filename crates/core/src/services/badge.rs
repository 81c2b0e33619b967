//! Badge awarder.
//!
//! Badge grants are a pure function of activity counters, evaluated
//! synchronously after the action that may have crossed a threshold.
//! Grants are idempotent and never revoked.

use crate::services::notification::NotificationService;
use communityfix_common::{AppResult, IdGenerator};
use communityfix_db::{
    entities::badge::{self, BadgeType},
    entities::report::ReportStatus,
    repositories::{BadgeRepository, ReportRepository, UserRepository},
};
use sea_orm::Set;

/// Comments required for the Helper badge.
const HELPER_COMMENT_THRESHOLD: i32 = 5;

/// Closed reports required for the Resolver badge.
const RESOLVER_CLOSED_THRESHOLD: u64 = 2;

/// Determine which badges a set of activity counters has earned.
#[must_use]
pub fn earned_badges(reports_count: i32, comments_count: i32, closed_count: u64) -> Vec<BadgeType> {
    let mut earned = Vec::new();
    if reports_count >= 1 {
        earned.push(BadgeType::FirstReport);
    }
    if comments_count >= HELPER_COMMENT_THRESHOLD {
        earned.push(BadgeType::Helper);
    }
    if closed_count >= RESOLVER_CLOSED_THRESHOLD {
        earned.push(BadgeType::Resolver);
    }
    earned
}

/// Human-readable badge label for notifications.
#[must_use]
pub const fn badge_label(badge_type: BadgeType) -> &'static str {
    match badge_type {
        BadgeType::FirstReport => "First Report",
        BadgeType::Helper => "Top Helper",
        BadgeType::Resolver => "Resolver",
    }
}

/// Badge service for milestone evaluation and grants.
#[derive(Clone)]
pub struct BadgeService {
    badge_repo: BadgeRepository,
    report_repo: ReportRepository,
    user_repo: UserRepository,
    notification_service: NotificationService,
    id_gen: IdGenerator,
}

impl BadgeService {
    /// Create a new badge service.
    #[must_use]
    pub const fn new(
        badge_repo: BadgeRepository,
        report_repo: ReportRepository,
        user_repo: UserRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            badge_repo,
            report_repo,
            user_repo,
            notification_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Re-evaluate all milestones for a user and grant anything newly earned.
    pub async fn evaluate(&self, user_id: &str) -> AppResult<Vec<badge::Model>> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let closed_count = self
            .report_repo
            .count_by_user_and_status(user_id, ReportStatus::Closed)
            .await?;

        let mut granted = Vec::new();
        for badge_type in earned_badges(user.reports_count, user.comments_count, closed_count) {
            if let Some(badge) = self.grant(user_id, badge_type).await? {
                granted.push(badge);
            }
        }
        Ok(granted)
    }

    /// Grant a badge if the user does not already hold it.
    async fn grant(
        &self,
        user_id: &str,
        badge_type: BadgeType,
    ) -> AppResult<Option<badge::Model>> {
        if self.badge_repo.has_badge(user_id, badge_type).await? {
            return Ok(None);
        }

        let model = badge::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            badge_type: Set(badge_type),
            awarded_at: Set(chrono::Utc::now().into()),
        };

        let badge = self.badge_repo.create(model).await?;
        tracing::info!(user_id = %user_id, badge = ?badge_type, "Badge awarded");

        if let Err(e) = self
            .notification_service
            .create_system_notification(
                user_id,
                &format!("You earned the {} badge", badge_label(badge_type)),
                "/profile",
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to create badge notification");
        }

        Ok(Some(badge))
    }

    /// Get all badges awarded to a user.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<badge::Model>> {
        self.badge_repo.find_by_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_badges_for_no_activity() {
        assert!(earned_badges(0, 0, 0).is_empty());
    }

    #[test]
    fn test_first_report_after_one_report() {
        assert_eq!(earned_badges(1, 0, 0), vec![BadgeType::FirstReport]);
    }

    #[test]
    fn test_helper_requires_five_comments() {
        assert!(earned_badges(0, 4, 0).is_empty());
        assert_eq!(earned_badges(0, 5, 0), vec![BadgeType::Helper]);
    }

    #[test]
    fn test_resolver_requires_two_closed_reports() {
        assert!(!earned_badges(2, 0, 1).contains(&BadgeType::Resolver));
        assert!(earned_badges(2, 0, 2).contains(&BadgeType::Resolver));
    }

    #[test]
    fn test_all_badges_at_once() {
        let earned = earned_badges(3, 7, 2);
        assert_eq!(
            earned,
            vec![BadgeType::FirstReport, BadgeType::Helper, BadgeType::Resolver]
        );
    }

    #[test]
    fn test_badge_labels() {
        assert_eq!(badge_label(BadgeType::FirstReport), "First Report");
        assert_eq!(badge_label(BadgeType::Helper), "Top Helper");
        assert_eq!(badge_label(BadgeType::Resolver), "Resolver");
    }
}
