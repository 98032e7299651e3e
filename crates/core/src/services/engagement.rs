//! Engagement service: like and favorite toggles.

use savora_common::{AppError, AppResult, IdGenerator};
use savora_db::{
    entities::{comment_like, favorite, recipe_like, reply_like},
    repositories::{CommentRepository, FavoriteRepository, LikeRepository, RecipeRepository, UserRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// Result of a like toggle: the new membership and the derived count.
///
/// The count comes from COUNT(*) over the membership rows after the
/// flip, so repeated toggles can never drift it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikeOutcome {
    pub liked: bool,
    pub like_count: u64,
}

/// Engagement service for like and favorite membership.
#[derive(Clone)]
pub struct EngagementService {
    like_repo: LikeRepository,
    favorite_repo: FavoriteRepository,
    recipe_repo: RecipeRepository,
    comment_repo: CommentRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl EngagementService {
    /// Create a new engagement service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        favorite_repo: FavoriteRepository,
        recipe_repo: RecipeRepository,
        comment_repo: CommentRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            like_repo,
            favorite_repo,
            recipe_repo,
            comment_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn check_actor(&self, actor_id: &str) -> AppResult<()> {
        let actor = self.user_repo.get_by_id(actor_id).await?;
        if !actor.can_mutate() {
            return Err(AppError::Forbidden(
                "Account is banned or deactivated".to_string(),
            ));
        }
        Ok(())
    }

    /// Toggle the actor's like on a recipe.
    pub async fn toggle_recipe_like(
        &self,
        actor_id: &str,
        recipe_id: &str,
    ) -> AppResult<LikeOutcome> {
        self.check_actor(actor_id).await?;
        self.recipe_repo.get_by_id(recipe_id).await?;

        let liked = match self.like_repo.find_recipe_like(actor_id, recipe_id).await? {
            Some(like) => {
                self.like_repo.delete_recipe_like(like).await?;
                false
            }
            None => {
                let model = recipe_like::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(actor_id.to_string()),
                    recipe_id: Set(recipe_id.to_string()),
                    created_at: Set(chrono::Utc::now().into()),
                };
                self.like_repo.create_recipe_like(model).await?;
                true
            }
        };

        let like_count = self.like_repo.count_recipe_likes(recipe_id).await?;
        Ok(LikeOutcome { liked, like_count })
    }

    /// Toggle the actor's like on a comment under a recipe.
    pub async fn toggle_comment_like(
        &self,
        actor_id: &str,
        recipe_id: &str,
        comment_id: &str,
    ) -> AppResult<LikeOutcome> {
        self.check_actor(actor_id).await?;
        self.comment_repo
            .get_under_recipe(recipe_id, comment_id)
            .await?;

        let liked = match self
            .like_repo
            .find_comment_like(actor_id, comment_id)
            .await?
        {
            Some(like) => {
                self.like_repo.delete_comment_like(like).await?;
                false
            }
            None => {
                let model = comment_like::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(actor_id.to_string()),
                    comment_id: Set(comment_id.to_string()),
                    created_at: Set(chrono::Utc::now().into()),
                };
                self.like_repo.create_comment_like(model).await?;
                true
            }
        };

        let like_count = self.like_repo.count_comment_likes(comment_id).await?;
        Ok(LikeOutcome { liked, like_count })
    }

    /// Toggle the actor's like on a reply, scoped through its comment
    /// and recipe so a reply id cannot be addressed across aggregates.
    pub async fn toggle_reply_like(
        &self,
        actor_id: &str,
        recipe_id: &str,
        comment_id: &str,
        reply_id: &str,
    ) -> AppResult<LikeOutcome> {
        self.check_actor(actor_id).await?;
        self.comment_repo
            .get_under_recipe(recipe_id, comment_id)
            .await?;
        self.comment_repo
            .get_reply_under_comment(comment_id, reply_id)
            .await?;

        let liked = match self.like_repo.find_reply_like(actor_id, reply_id).await? {
            Some(like) => {
                self.like_repo.delete_reply_like(like).await?;
                false
            }
            None => {
                let model = reply_like::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(actor_id.to_string()),
                    reply_id: Set(reply_id.to_string()),
                    created_at: Set(chrono::Utc::now().into()),
                };
                self.like_repo.create_reply_like(model).await?;
                true
            }
        };

        let like_count = self.like_repo.count_reply_likes(reply_id).await?;
        Ok(LikeOutcome { liked, like_count })
    }

    /// Toggle the actor's favorite on a recipe. Returns the new membership.
    pub async fn toggle_favorite(&self, actor_id: &str, recipe_id: &str) -> AppResult<bool> {
        self.check_actor(actor_id).await?;
        self.recipe_repo.get_by_id(recipe_id).await?;

        match self.favorite_repo.find_by_pair(actor_id, recipe_id).await? {
            Some(favorite) => {
                self.favorite_repo.delete(favorite).await?;
                Ok(false)
            }
            None => {
                let model = favorite::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(actor_id.to_string()),
                    recipe_id: Set(recipe_id.to_string()),
                    created_at: Set(chrono::Utc::now().into()),
                };
                self.favorite_repo.create(model).await?;
                Ok(true)
            }
        }
    }

    /// List a user's favorited recipes (paginated, by membership row).
    pub async fn list_favorites(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<favorite::Model>> {
        self.user_repo.get_by_id(user_id).await?;
        self.favorite_repo.find_by_user(user_id, limit, until_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use savora_db::entities::{comment, recipe, user};
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

    fn create_test_recipe(id: &str) -> recipe::Model {
        recipe::Model {
            id: id.to_string(),
            user_id: "author".to_string(),
            title: "Carbonara".to_string(),
            description: None,
            category_id: None,
            views: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_like(id: &str, user_id: &str, recipe_id: &str) -> recipe_like::Model {
        recipe_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            recipe_id: recipe_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service(
        like_db: Arc<sea_orm::DatabaseConnection>,
        favorite_db: Arc<sea_orm::DatabaseConnection>,
        recipe_db: Arc<sea_orm::DatabaseConnection>,
        comment_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
    ) -> EngagementService {
        EngagementService::new(
            LikeRepository::new(like_db),
            FavoriteRepository::new(favorite_db),
            RecipeRepository::new(recipe_db),
            CommentRepository::new(comment_db),
            UserRepository::new(user_db),
        )
    }

    fn idle() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[tokio::test]
    async fn test_toggle_recipe_like_on() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1")]])
                .into_connection(),
        );
        let recipe_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_recipe("r1")]])
                .into_connection(),
        );
        let like = create_test_like("l1", "user1", "r1");
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // lookup -> none, insert returning, count
                .append_query_results([Vec::<recipe_like::Model>::new(), vec![like]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let service = service(like_db, idle(), recipe_db, idle(), user_db);
        let outcome = service.toggle_recipe_like("user1", "r1").await.unwrap();

        assert!(outcome.liked);
        assert_eq!(outcome.like_count, 1);
    }

    #[tokio::test]
    async fn test_toggle_recipe_like_off() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1")]])
                .into_connection(),
        );
        let recipe_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_recipe("r1")]])
                .into_connection(),
        );
        let like = create_test_like("l1", "user1", "r1");
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let service = service(like_db, idle(), recipe_db, idle(), user_db);
        let outcome = service.toggle_recipe_like("user1", "r1").await.unwrap();

        assert!(!outcome.liked);
        assert_eq!(outcome.like_count, 0);
    }

    #[tokio::test]
    async fn test_toggle_recipe_like_banned_actor() {
        let mut banned = create_test_user("user1");
        banned.ban_expires_at = Some((Utc::now() + Duration::hours(2)).into());

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[banned]])
                .into_connection(),
        );

        let service = service(idle(), idle(), idle(), idle(), user_db);
        let result = service.toggle_recipe_like("user1", "r1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_toggle_recipe_like_missing_recipe() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1")]])
                .into_connection(),
        );
        let recipe_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<recipe::Model>::new()])
                .into_connection(),
        );

        let service = service(idle(), idle(), recipe_db, idle(), user_db);
        let result = service.toggle_recipe_like("user1", "missing").await;

        assert!(matches!(result, Err(AppError::RecipeNotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_comment_like_cross_recipe() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1")]])
                .into_connection(),
        );
        // comment id exists but not under this recipe
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let service = service(idle(), idle(), idle(), comment_db, user_db);
        let result = service.toggle_comment_like("user1", "r1", "c-other").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_favorite_round_trip() {
        let fav = favorite::Model {
            id: "fav1".to_string(),
            user_id: "user1".to_string(),
            recipe_id: "r1".to_string(),
            created_at: Utc::now().into(),
        };

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_user("user1")], vec![create_test_user("user1")]])
                .into_connection(),
        );
        let recipe_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_recipe("r1")], vec![create_test_recipe("r1")]])
                .into_connection(),
        );
        let favorite_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // first toggle: absent then inserted; second: present then deleted
                .append_query_results([Vec::<favorite::Model>::new(), vec![fav.clone()]])
                .append_query_results([[fav]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service(idle(), favorite_db, recipe_db, idle(), user_db);

        let on = service.toggle_favorite("user1", "r1").await.unwrap();
        assert!(on);

        let off = service.toggle_favorite("user1", "r1").await.unwrap();
        assert!(!off);
    }
}
