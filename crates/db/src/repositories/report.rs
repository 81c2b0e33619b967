//! Report repository.

use std::sync::Arc;

use crate::entities::{Report, report};
use communityfix_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a report by ID, failing if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReportNotFound(id.to_string()))
    }

    /// Create a new report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a report.
    pub async fn update(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the feed (newest-first, cursor-paginated).
    ///
    /// Hidden reports are excluded unless `include_hidden` is set (admins).
    pub async fn find_feed(
        &self,
        include_hidden: bool,
        category: Option<report::Category>,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<report::Model>> {
        let mut query = Report::find().order_by_desc(report::Column::Id);

        if !include_hidden {
            query = query.filter(report::Column::IsHidden.eq(false));
        }

        if let Some(category) = category {
            query = query.filter(report::Column::Category.eq(category));
        }

        if let Some(id) = until_id {
            query = query.filter(report::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get reports created by a user (newest-first, cursor-paginated).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<report::Model>> {
        let mut query = Report::find()
            .filter(report::Column::UserId.eq(user_id))
            .order_by_desc(report::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(report::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get reports by IDs (order unspecified).
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<report::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Report::find()
            .filter(report::Column::Id.is_in(ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all reports including hidden ones (admin dashboard, offset-paginated).
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<report::Model>> {
        Report::find()
            .order_by_desc(report::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count a user's reports with the given status.
    pub async fn count_by_user_and_status(
        &self,
        user_id: &str,
        status: report::ReportStatus,
    ) -> AppResult<u64> {
        Report::find()
            .filter(report::Column::UserId.eq(user_id))
            .filter(report::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment comment count atomically (single UPDATE query, no fetch).
    pub async fn increment_comments_count(&self, report_id: &str) -> AppResult<()> {
        Report::update_many()
            .col_expr(
                report::Column::CommentsCount,
                Expr::col(report::Column::CommentsCount).add(1),
            )
            .filter(report::Column::Id.eq(report_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::report::{Category, ReportStatus};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_report(id: &str, user_id: &str) -> report::Model {
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

    #[tokio::test]
    async fn test_find_by_id_found() {
        let report = create_test_report("r1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report.clone()]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.find_by_id("r1").await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.id, "r1");
        assert_eq!(found.status, ReportStatus::Open);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::ReportNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_feed() {
        let r1 = create_test_report("r1", "u1");
        let r2 = create_test_report("r2", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r2, r1]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.find_feed(false, None, 10, None).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
