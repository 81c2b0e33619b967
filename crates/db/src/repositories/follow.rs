//! Follow repository.

use std::sync::Arc;

use crate::entities::{Follow, follow};
use communityfix_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow relationship by report and user.
    pub async fn find_by_pair(
        &self,
        report_id: &str,
        user_id: &str,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find()
            .filter(follow::Column::ReportId.eq(report_id))
            .filter(follow::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following a report.
    pub async fn is_following(&self, report_id: &str, user_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(report_id, user_id).await?.is_some())
    }

    /// Create a new follow relationship.
    pub async fn create(&self, model: follow::ActiveModel) -> AppResult<follow::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a follow relationship by pair.
    pub async fn delete_by_pair(&self, report_id: &str, user_id: &str) -> AppResult<()> {
        let follow = self.find_by_pair(report_id, user_id).await?;
        if let Some(f) = follow {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Count followers of a report.
    ///
    /// Always a cardinality query over the follow table; there is no cached
    /// counter column to drift.
    pub async fn count_for_report(&self, report_id: &str) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::ReportId.eq(report_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all followers of a report (for notification fan-out).
    pub async fn find_by_report(&self, report_id: &str) -> AppResult<Vec<follow::Model>> {
        Follow::find()
            .filter(follow::Column::ReportId.eq(report_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get reports a user follows (newest-first, cursor-paginated).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<follow::Model>> {
        let mut query = Follow::find()
            .filter(follow::Column::UserId.eq(user_id))
            .order_by_desc(follow::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follow::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_follow(id: &str, report_id: &str, user_id: &str) -> follow::Model {
        follow::Model {
            id: id.to_string(),
            report_id: report_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let follow = create_test_follow("f1", "r1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[follow.clone()]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.find_by_pair("r1", "u1").await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.report_id, "r1");
        assert_eq!(found.user_id, "u1");
    }

    #[tokio::test]
    async fn test_find_by_pair_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.find_by_pair("r1", "u2").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_is_following_true() {
        let follow = create_test_follow("f1", "r1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[follow.clone()]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        assert!(repo.is_following("r1", "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_following_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        assert!(!repo.is_following("r1", "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_report() {
        let f1 = create_test_follow("f1", "r1", "u1");
        let f2 = create_test_follow("f2", "r1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.find_by_report("r1").await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
