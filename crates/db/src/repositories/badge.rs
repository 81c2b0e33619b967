//! Badge repository.

use std::sync::Arc;

use crate::entities::{Badge, badge};
use communityfix_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Badge repository for database operations.
#[derive(Clone)]
pub struct BadgeRepository {
    db: Arc<DatabaseConnection>,
}

impl BadgeRepository {
    /// Create a new badge repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get all badges awarded to a user (oldest-first).
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<badge::Model>> {
        Badge::find()
            .filter(badge::Column::UserId.eq(user_id))
            .order_by_asc(badge::Column::AwardedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user already holds a badge of the given type.
    pub async fn has_badge(&self, user_id: &str, badge_type: badge::BadgeType) -> AppResult<bool> {
        let existing = Badge::find()
            .filter(badge::Column::UserId.eq(user_id))
            .filter(badge::Column::BadgeType.eq(badge_type))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(existing.is_some())
    }

    /// Create a new badge grant.
    pub async fn create(&self, model: badge::ActiveModel) -> AppResult<badge::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
