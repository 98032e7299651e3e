//! Recipe repository.

use std::sync::Arc;

use crate::entities::{category, ingredient, recipe, Category, Ingredient, Recipe};
use savora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
    sea_query::Expr,
};

/// Recipe repository for database operations.
///
/// Also owns the lookups for the recipe aggregate's satellites
/// (ingredients, categories), which double as report-target validation.
#[derive(Clone)]
pub struct RecipeRepository {
    db: Arc<DatabaseConnection>,
}

impl RecipeRepository {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a recipe by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<recipe::Model>> {
        Recipe::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a recipe by ID, failing if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<recipe::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RecipeNotFound(id.to_string()))
    }

    /// Create a new recipe.
    pub async fn create(&self, model: recipe::ActiveModel) -> AppResult<recipe::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a recipe; comments, likes, favorites and ingredients cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let recipe = self.get_by_id(id).await?;
        recipe
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List recipes by owner (paginated).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<recipe::Model>> {
        let mut query = Recipe::find()
            .filter(recipe::Column::UserId.eq(user_id))
            .order_by_desc(recipe::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(recipe::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the view counter atomically (single UPDATE query, no fetch).
    ///
    /// Monotonic, no dedup by viewer; concurrent views never lose an
    /// increment because there is no read-modify-write.
    pub async fn increment_views(&self, recipe_id: &str) -> AppResult<()> {
        Recipe::update_many()
            .col_expr(recipe::Column::Views, Expr::col(recipe::Column::Views).add(1))
            .filter(recipe::Column::Id.eq(recipe_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Insert an ingredient row.
    pub async fn add_ingredient(
        &self,
        model: ingredient::ActiveModel,
    ) -> AppResult<ingredient::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a recipe's ingredients in position order.
    pub async fn find_ingredients(&self, recipe_id: &str) -> AppResult<Vec<ingredient::Model>> {
        Ingredient::find()
            .filter(ingredient::Column::RecipeId.eq(recipe_id))
            .order_by_asc(ingredient::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an ingredient by ID (report-target validation).
    pub async fn find_ingredient_by_id(&self, id: &str) -> AppResult<Option<ingredient::Model>> {
        Ingredient::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a category by ID (report-target validation).
    pub async fn find_category_by_id(&self, id: &str) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_recipe(id: &str, user_id: &str) -> recipe::Model {
        recipe::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Test recipe".to_string(),
            description: None,
            category_id: None,
            views: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let recipe = create_test_recipe("r1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[recipe.clone()]])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let result = repo.get_by_id("r1").await.unwrap();

        assert_eq!(result.id, "r1");
        assert_eq!(result.user_id, "user1");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<recipe::Model>::new()])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        match result {
            Err(AppError::RecipeNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected RecipeNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_increment_views_is_single_update() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        repo.increment_views("r1").await.unwrap();
    }

    #[tokio::test]
    async fn test_find_ingredients_ordered() {
        let i1 = ingredient::Model {
            id: "i1".to_string(),
            recipe_id: "r1".to_string(),
            name: "Flour".to_string(),
            quantity: Some("2 cups".to_string()),
            position: 0,
        };
        let i2 = ingredient::Model {
            id: "i2".to_string(),
            recipe_id: "r1".to_string(),
            name: "Sugar".to_string(),
            quantity: None,
            position: 1,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[i1, i2]])
                .into_connection(),
        );

        let repo = RecipeRepository::new(db);
        let result = repo.find_ingredients("r1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Flour");
    }
}
