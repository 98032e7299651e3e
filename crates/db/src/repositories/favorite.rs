//! Favorite repository.

use std::sync::Arc;

use crate::entities::{favorite, Favorite};
use savora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Favorite repository for database operations.
#[derive(Clone)]
pub struct FavoriteRepository {
    db: Arc<DatabaseConnection>,
}

impl FavoriteRepository {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a favorite by (user, recipe).
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        recipe_id: &str,
    ) -> AppResult<Option<favorite::Model>> {
        Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::RecipeId.eq(recipe_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a favorite row.
    pub async fn create(&self, model: favorite::ActiveModel) -> AppResult<favorite::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a favorite row.
    pub async fn delete(&self, favorite: favorite::Model) -> AppResult<()> {
        favorite
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List a user's favorited recipes (paginated).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<favorite::Model>> {
        let mut query = Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(favorite::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count how many users favorited a recipe. Derived by scanning.
    pub async fn count_by_recipe(&self, recipe_id: &str) -> AppResult<u64> {
        Favorite::find()
            .filter(favorite::Column::RecipeId.eq(recipe_id))
            .count(self.db.as_ref())
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

    fn create_test_favorite(id: &str, user_id: &str, recipe_id: &str) -> favorite::Model {
        favorite::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            recipe_id: recipe_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let fav = create_test_favorite("fav1", "user1", "r1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fav.clone()]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo.find_by_pair("user1", "r1").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let f1 = create_test_favorite("fav1", "user1", "r1");
        let f2 = create_test_favorite("fav2", "user1", "r2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo.find_by_user("user1", 10, None).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
