//! Attachment repository.

use std::sync::Arc;

use crate::entities::{Attachment, attachment};
use communityfix_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Attachment repository for database operations.
#[derive(Clone)]
pub struct AttachmentRepository {
    db: Arc<DatabaseConnection>,
}

impl AttachmentRepository {
    /// Create a new attachment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an attachment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<attachment::Model>> {
        Attachment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an attachment by ID, failing if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<attachment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attachment {id}")))
    }

    /// Find a user's attachment by content hash (for upload dedup).
    pub async fn find_by_md5_for_user(
        &self,
        md5: &str,
        user_id: &str,
    ) -> AppResult<Option<attachment::Model>> {
        Attachment::find()
            .filter(attachment::Column::Md5.eq(md5))
            .filter(attachment::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new attachment.
    pub async fn create(&self, model: attachment::ActiveModel) -> AppResult<attachment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
