//! Following service.

use savora_common::{AppError, AppResult, IdGenerator};
use savora_db::{
    entities::following,
    repositories::{FollowingRepository, UserRepository},
};
use sea_orm::Set;

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    following_repo: FollowingRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub const fn new(following_repo: FollowingRepository, user_repo: UserRepository) -> Self {
        Self {
            following_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle the follow edge from `actor_id` to `target_id`.
    ///
    /// Returns the new membership: `true` when the actor now follows the
    /// target. The edge is a single row, so both sides of the relation
    /// change in one statement and the follower/following symmetry can
    /// never be half-applied.
    pub async fn toggle(&self, actor_id: &str, target_id: &str) -> AppResult<bool> {
        if actor_id == target_id {
            return Err(AppError::Conflict("Cannot follow yourself".to_string()));
        }

        let actor = self.user_repo.get_by_id(actor_id).await?;
        if !actor.can_mutate() {
            return Err(AppError::Forbidden(
                "Account is banned or deactivated".to_string(),
            ));
        }

        // Target must resolve even for an unfollow
        self.user_repo.get_by_id(target_id).await?;

        match self.following_repo.find_by_pair(actor_id, target_id).await? {
            Some(edge) => {
                self.following_repo
                    .delete_by_pair(&edge.follower_id, &edge.followee_id)
                    .await?;
                tracing::debug!(actor_id, target_id, "Unfollowed");
                Ok(false)
            }
            None => {
                let model = following::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    follower_id: Set(actor_id.to_string()),
                    followee_id: Set(target_id.to_string()),
                    created_at: Set(chrono::Utc::now().into()),
                };
                self.following_repo.create(model).await?;
                tracing::debug!(actor_id, target_id, "Followed");
                Ok(true)
            }
        }
    }

    /// Check whether `actor_id` currently follows `target_id`.
    pub async fn is_following(&self, actor_id: &str, target_id: &str) -> AppResult<bool> {
        self.following_repo.is_following(actor_id, target_id).await
    }

    /// Get followers of a user (paginated).
    pub async fn get_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<following::Model>> {
        self.user_repo.get_by_id(user_id).await?;
        self.following_repo
            .find_followers(user_id, limit, until_id)
            .await
    }

    /// Get users that a user is following (paginated).
    pub async fn get_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<following::Model>> {
        self.user_repo.get_by_id(user_id).await?;
        self.following_repo
            .find_following(user_id, limit, until_id)
            .await
    }

    /// Derived follower count.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        self.following_repo.count_followers(user_id).await
    }

    /// Derived following count.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        self.following_repo.count_following(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use savora_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str) -> user::Model {
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
            is_admin: false,
            ban_expires_at: None,
            ban_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_edge(id: &str, follower_id: &str, followee_id: &str) -> following::Model {
        following::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_toggle_self_follow_conflict() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let following_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
        );

        let result = service.toggle("user1", "user1").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_toggle_banned_actor_forbidden() {
        let mut actor = create_test_user("user1");
        actor.ban_expires_at = Some((Utc::now() + Duration::hours(1)).into());

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[actor]])
                .into_connection(),
        );
        let following_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
        );

        let result = service.toggle("user1", "user2").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_toggle_target_not_found() {
        let actor = create_test_user("user1");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![actor], Vec::<user::Model>::new()])
                .into_connection(),
        );
        let following_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
        );

        let result = service.toggle("user1", "ghost").await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_creates_edge_when_absent() {
        let actor = create_test_user("user1");
        let target = create_test_user("user2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![actor], vec![target]])
                .into_connection(),
        );
        let edge = create_test_edge("f1", "user1", "user2");
        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // no existing edge, then the inserted row
                .append_query_results([Vec::<following::Model>::new(), vec![edge]])
                .into_connection(),
        );

        let service = FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
        );

        let result = service.toggle("user1", "user2").await.unwrap();
        assert!(result);
    }

    #[tokio::test]
    async fn test_toggle_removes_edge_when_present() {
        let actor = create_test_user("user1");
        let target = create_test_user("user2");
        let edge = create_test_edge("f1", "user1", "user2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![actor], vec![target]])
                .into_connection(),
        );
        let following_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // existing edge lookup, then the delete's re-fetch
                .append_query_results([vec![edge.clone()], vec![edge]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = FollowingService::new(
            FollowingRepository::new(following_db),
            UserRepository::new(user_db),
        );

        let result = service.toggle("user1", "user2").await.unwrap();
        assert!(!result);
    }
}
