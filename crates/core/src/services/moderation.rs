//! Moderation service: reports and account sanctions.

use chrono::{DateTime, Duration, Utc};
use savora_common::{AppError, AppResult, IdGenerator};
use savora_db::{
    entities::{
        report,
        report::{ReportReason, ReportStatus, ReportTargetType},
        user,
    },
    repositories::{RecipeRepository, ReportRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;

const MAX_REPORT_DESCRIPTION_LENGTH: usize = 2000;

/// Unit for a ban duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BanDurationUnit {
    Hours,
    Days,
}

/// Input for creating a report.
pub struct CreateReportInput {
    pub target_type: ReportTargetType,
    pub target_id: String,
    pub reason: ReportReason,
    pub description: Option<String>,
}

/// Input for banning a user.
pub struct BanUserInput {
    pub duration: i64,
    pub unit: BanDurationUnit,
    pub reason: Option<String>,
}

/// Moderation service for business logic.
#[derive(Clone)]
pub struct ModerationService {
    report_repo: ReportRepository,
    user_repo: UserRepository,
    recipe_repo: RecipeRepository,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        user_repo: UserRepository,
        recipe_repo: RecipeRepository,
    ) -> Self {
        Self {
            report_repo,
            user_repo,
            recipe_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn require_admin(&self, actor_id: &str) -> AppResult<user::Model> {
        let actor = self.user_repo.get_by_id(actor_id).await?;
        if !actor.is_admin {
            return Err(AppError::Forbidden("Admin privileges required".to_string()));
        }
        Ok(actor)
    }

    async fn check_target_exists(
        &self,
        target_type: ReportTargetType,
        target_id: &str,
    ) -> AppResult<()> {
        let exists = match target_type {
            ReportTargetType::Recipe => self.recipe_repo.find_by_id(target_id).await?.is_some(),
            ReportTargetType::Ingredient => self
                .recipe_repo
                .find_ingredient_by_id(target_id)
                .await?
                .is_some(),
            ReportTargetType::Category => self
                .recipe_repo
                .find_category_by_id(target_id)
                .await?
                .is_some(),
            ReportTargetType::User => self.user_repo.find_by_id(target_id).await?.is_some(),
        };
        if !exists {
            return Err(AppError::NotFound(format!(
                "Report target {target_id} not found"
            )));
        }
        Ok(())
    }

    /// Create a report against some content or a user.
    ///
    /// Any authenticated user may report, including banned ones; sanctions
    /// limit what a user can publish, not what they can flag. Duplicate
    /// reports from the same reporter are allowed, each is its own row.
    pub async fn create_report(
        &self,
        reporter_id: &str,
        input: CreateReportInput,
    ) -> AppResult<report::Model> {
        self.user_repo.get_by_id(reporter_id).await?;
        self.check_target_exists(input.target_type, &input.target_id)
            .await?;

        let description = match input.description {
            Some(text) => {
                let trimmed = text.trim();
                if trimmed.chars().count() > MAX_REPORT_DESCRIPTION_LENGTH {
                    return Err(AppError::InvalidInput(format!(
                        "Description cannot exceed {MAX_REPORT_DESCRIPTION_LENGTH} characters"
                    )));
                }
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            None => None,
        };

        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(reporter_id.to_string()),
            target_type: Set(input.target_type),
            target_id: Set(input.target_id),
            reason: Set(input.reason),
            description: Set(description),
            status: Set(ReportStatus::Pending),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let created = self.report_repo.create(model).await?;
        tracing::info!(report_id = %created.id, reporter_id, "Report created");
        Ok(created)
    }

    /// Move a report to a new status.
    ///
    /// The only legal hop is out of `Pending`; reviewed, resolved and
    /// dismissed are terminal and cannot be reopened.
    pub async fn update_report_status(
        &self,
        admin_id: &str,
        report_id: &str,
        new_status: ReportStatus,
    ) -> AppResult<report::Model> {
        self.require_admin(admin_id).await?;

        let current = self.report_repo.get_by_id(report_id).await?;
        if !current.status.can_transition_to(new_status) {
            return Err(AppError::InvalidTransition(format!(
                "Cannot move report from {:?} to {:?}",
                current.status, new_status
            )));
        }

        let mut model: report::ActiveModel = current.into();
        model.status = Set(new_status);
        model.updated_at = Set(Some(Utc::now().into()));
        let updated = self.report_repo.update(model).await?;

        tracing::info!(report_id, admin_id, status = ?updated.status, "Report status updated");
        Ok(updated)
    }

    /// Delete a report outright.
    pub async fn delete_report(&self, admin_id: &str, report_id: &str) -> AppResult<()> {
        self.require_admin(admin_id).await?;
        let current = self.report_repo.get_by_id(report_id).await?;
        self.report_repo.delete(current).await?;
        tracing::info!(report_id, admin_id, "Report deleted");
        Ok(())
    }

    /// Get a single report.
    pub async fn get_report(&self, admin_id: &str, report_id: &str) -> AppResult<report::Model> {
        self.require_admin(admin_id).await?;
        self.report_repo.get_by_id(report_id).await
    }

    /// List reports for the moderation queue, newest first.
    pub async fn list_reports(
        &self,
        admin_id: &str,
        status: Option<ReportStatus>,
        target_type: Option<ReportTargetType>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.require_admin(admin_id).await?;
        self.report_repo
            .list(status, target_type, limit.min(100), offset)
            .await
    }

    /// Number of reports waiting in the queue.
    pub async fn pending_report_count(&self, admin_id: &str) -> AppResult<u64> {
        self.require_admin(admin_id).await?;
        self.report_repo.count_by_status(ReportStatus::Pending).await
    }

    /// Ban a user for a bounded duration.
    ///
    /// The expiry timestamp is stored on the user row; nothing scheduled
    /// runs when it passes, the ban simply stops holding the next time the
    /// predicate is evaluated.
    pub async fn ban_user(
        &self,
        admin_id: &str,
        target_id: &str,
        input: BanUserInput,
    ) -> AppResult<user::Model> {
        self.require_admin(admin_id).await?;

        if admin_id == target_id {
            return Err(AppError::InvalidInput(
                "Cannot ban your own account".to_string(),
            ));
        }
        if input.duration <= 0 {
            return Err(AppError::InvalidInput(
                "Ban duration must be positive".to_string(),
            ));
        }

        self.user_repo.get_by_id(target_id).await?;

        let expires_at = Self::ban_expiry(Utc::now(), input.duration, input.unit)?;
        let banned = self
            .user_repo
            .set_ban(target_id, expires_at, input.reason)
            .await?;

        tracing::info!(target_id, admin_id, %expires_at, "User banned");
        Ok(banned)
    }

    fn ban_expiry(
        now: DateTime<Utc>,
        duration: i64,
        unit: BanDurationUnit,
    ) -> AppResult<DateTime<Utc>> {
        let span = match unit {
            BanDurationUnit::Hours => Duration::try_hours(duration),
            BanDurationUnit::Days => Duration::try_days(duration),
        };
        let span =
            span.ok_or_else(|| AppError::InvalidInput("Ban duration out of range".to_string()))?;
        now.checked_add_signed(span)
            .ok_or_else(|| AppError::InvalidInput("Ban duration out of range".to_string()))
    }

    /// Lift a ban before it expires.
    pub async fn unban_user(&self, admin_id: &str, target_id: &str) -> AppResult<user::Model> {
        self.require_admin(admin_id).await?;
        self.user_repo.get_by_id(target_id).await?;
        let user = self.user_repo.clear_ban(target_id).await?;
        tracing::info!(target_id, admin_id, "User unbanned");
        Ok(user)
    }

    /// Activate or deactivate an account.
    pub async fn set_active(
        &self,
        admin_id: &str,
        target_id: &str,
        active: bool,
    ) -> AppResult<user::Model> {
        self.require_admin(admin_id).await?;
        self.user_repo.get_by_id(target_id).await?;
        let user = self.user_repo.set_active(target_id, active).await?;
        tracing::info!(target_id, admin_id, active, "Account active flag set");
        Ok(user)
    }

    /// Grant or revoke admin privileges.
    pub async fn set_admin(
        &self,
        admin_id: &str,
        target_id: &str,
        is_admin: bool,
    ) -> AppResult<user::Model> {
        self.require_admin(admin_id).await?;
        self.user_repo.get_by_id(target_id).await?;

        if admin_id == target_id && !is_admin {
            // Legal, but a likely footgun worth a trace.
            tracing::warn!(admin_id, "Admin revoked their own privileges");
        }

        let user = self.user_repo.set_admin(target_id, is_admin).await?;
        tracing::info!(target_id, admin_id, is_admin, "Admin flag set");
        Ok(user)
    }

    /// List users whose ban has not yet expired.
    pub async fn list_banned_users(
        &self,
        admin_id: &str,
        limit: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.require_admin(admin_id).await?;
        self.user_repo.find_banned(Utc::now(), limit.min(100)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: id.to_string(),
            username_lower: id.to_string(),
            email: format!("{id}@example.com"),
            token: None,
            display_name: None,
            bio: None,
            avatar_url: None,
            is_active: true,
            is_admin,
            ban_expires_at: None,
            ban_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_report(id: &str, status: ReportStatus) -> report::Model {
        report::Model {
            id: id.to_string(),
            reporter_id: "user1".to_string(),
            target_type: ReportTargetType::Recipe,
            target_id: "r1".to_string(),
            reason: ReportReason::Spam,
            description: None,
            status,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(
        report_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
        recipe_db: Arc<sea_orm::DatabaseConnection>,
    ) -> ModerationService {
        ModerationService::new(
            ReportRepository::new(report_db),
            UserRepository::new(user_db),
            RecipeRepository::new(recipe_db),
        )
    }

    #[tokio::test]
    async fn test_create_report_unknown_target() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1", false)]])
                .into_connection(),
        );
        let recipe_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<savora_db::entities::recipe::Model>::new()])
                .into_connection(),
        );
        let report_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service(report_db, user_db, recipe_db);
        let result = service
            .create_report(
                "user1",
                CreateReportInput {
                    target_type: ReportTargetType::Recipe,
                    target_id: "missing".to_string(),
                    reason: ReportReason::Spam,
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_report_banned_reporter_allowed() {
        let mut reporter = create_test_user("user1", false);
        reporter.ban_expires_at = Some((Utc::now() + Duration::days(1)).into());

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![reporter], vec![create_test_user("user2", false)]])
                .into_connection(),
        );
        let recipe_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_report("rep1", ReportStatus::Pending)]])
                .into_connection(),
        );

        let service = service(report_db, user_db, recipe_db);
        let result = service
            .create_report(
                "user1",
                CreateReportInput {
                    target_type: ReportTargetType::User,
                    target_id: "user2".to_string(),
                    reason: ReportReason::Harassment,
                    description: Some("   ".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.status, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_report_status_requires_admin() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1", false)]])
                .into_connection(),
        );
        let recipe_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let report_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service(report_db, user_db, recipe_db);
        let result = service
            .update_report_status("user1", "rep1", ReportStatus::Resolved)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_report_status_from_pending() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("admin1", true)]])
                .into_connection(),
        );
        let recipe_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let mut resolved = create_test_report("rep1", ReportStatus::Resolved);
        resolved.updated_at = Some(Utc::now().into());
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![create_test_report("rep1", ReportStatus::Pending)],
                    vec![resolved],
                ])
                .into_connection(),
        );

        let service = service(report_db, user_db, recipe_db);
        let result = service
            .update_report_status("admin1", "rep1", ReportStatus::Resolved)
            .await
            .unwrap();

        assert_eq!(result.status, ReportStatus::Resolved);
        assert!(result.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_report_status_terminal_rejected() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("admin1", true)]])
                .into_connection(),
        );
        let recipe_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_report("rep1", ReportStatus::Dismissed)]])
                .into_connection(),
        );

        let service = service(report_db, user_db, recipe_db);
        let result = service
            .update_report_status("admin1", "rep1", ReportStatus::Resolved)
            .await;

        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_ban_user_self_rejected() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("admin1", true)]])
                .into_connection(),
        );
        let recipe_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let report_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service(report_db, user_db, recipe_db);
        let result = service
            .ban_user(
                "admin1",
                "admin1",
                BanUserInput {
                    duration: 1,
                    unit: BanDurationUnit::Days,
                    reason: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_ban_user_nonpositive_duration() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("admin1", true)]])
                .into_connection(),
        );
        let recipe_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let report_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service(report_db, user_db, recipe_db);
        let result = service
            .ban_user(
                "admin1",
                "user1",
                BanUserInput {
                    duration: 0,
                    unit: BanDurationUnit::Hours,
                    reason: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_ban_expiry_units() {
        let now = Utc::now();

        let hours = ModerationService::ban_expiry(now, 6, BanDurationUnit::Hours).unwrap();
        assert_eq!(hours - now, Duration::hours(6));

        let days = ModerationService::ban_expiry(now, 3, BanDurationUnit::Days).unwrap();
        assert_eq!(days - now, Duration::days(3));
    }
}
