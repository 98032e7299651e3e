//! Report repository.

use std::sync::Arc;

use crate::entities::{
    report::{self, ReportStatus, ReportTargetType},
    Report,
};
use savora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
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

    /// Create a new report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a report by ID, failing if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
    }

    /// Persist a status change.
    pub async fn update(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a report.
    pub async fn delete(&self, report: report::Model) -> AppResult<()> {
        report
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List reports, optionally filtered, newest first.
    pub async fn list(
        &self,
        status: Option<ReportStatus>,
        target_type: Option<ReportTargetType>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        let mut query = Report::find().order_by_desc(report::Column::CreatedAt);

        if let Some(status) = status {
            query = query.filter(report::Column::Status.eq(status));
        }
        if let Some(target_type) = target_type {
            query = query.filter(report::Column::TargetType.eq(target_type));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reports in a given status.
    pub async fn count_by_status(&self, status: ReportStatus) -> AppResult<u64> {
        Report::find()
            .filter(report::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::report::ReportReason;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_report(id: &str, reporter_id: &str) -> report::Model {
        report::Model {
            id: id.to_string(),
            reporter_id: reporter_id.to_string(),
            target_type: ReportTargetType::Recipe,
            target_id: "r1".to_string(),
            reason: ReportReason::Spam,
            description: None,
            status: ReportStatus::Pending,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let report = create_test_report("rep1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report.clone()]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.get_by_id("rep1").await.unwrap();

        assert_eq!(result.id, "rep1");
        assert_eq!(result.status, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_filtered() {
        let r1 = create_test_report("rep1", "user1");
        let r2 = create_test_report("rep2", "user2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo
            .list(Some(ReportStatus::Pending), None, 50, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }
}
