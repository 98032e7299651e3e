//! Comment repository.

use std::sync::Arc;

use crate::entities::{comment, reply, Comment, Reply};
use savora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Comment repository covering comments and their replies.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID, scoped to a recipe.
    ///
    /// The recipe scope matters: a comment id from another recipe must not
    /// resolve, otherwise reply/delete requests could cross aggregates.
    pub async fn find_under_recipe(
        &self,
        recipe_id: &str,
        comment_id: &str,
    ) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(comment_id)
            .filter(comment::Column::RecipeId.eq(recipe_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a comment by ID under a recipe, failing if absent.
    pub async fn get_under_recipe(
        &self,
        recipe_id: &str,
        comment_id: &str,
    ) -> AppResult<comment::Model> {
        self.find_under_recipe(recipe_id, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {comment_id} not found")))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment; its replies and likes cascade in the same statement.
    pub async fn delete(&self, comment: comment::Model) -> AppResult<()> {
        comment
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List a recipe's comments in insertion order.
    pub async fn find_by_recipe(&self, recipe_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::RecipeId.eq(recipe_id))
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ========== Replies ==========

    /// Find a reply by ID, scoped to a comment.
    pub async fn find_reply_under_comment(
        &self,
        comment_id: &str,
        reply_id: &str,
    ) -> AppResult<Option<reply::Model>> {
        Reply::find_by_id(reply_id)
            .filter(reply::Column::CommentId.eq(comment_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a reply by ID under a comment, failing if absent.
    pub async fn get_reply_under_comment(
        &self,
        comment_id: &str,
        reply_id: &str,
    ) -> AppResult<reply::Model> {
        self.find_reply_under_comment(comment_id, reply_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reply {reply_id} not found")))
    }

    /// Create a new reply.
    pub async fn create_reply(&self, model: reply::ActiveModel) -> AppResult<reply::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a comment's replies in insertion order.
    pub async fn find_replies(&self, comment_id: &str) -> AppResult<Vec<reply::Model>> {
        Reply::find()
            .filter(reply::Column::CommentId.eq(comment_id))
            .order_by_asc(reply::Column::Id)
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

    fn create_test_comment(id: &str, recipe_id: &str, user_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            recipe_id: recipe_id.to_string(),
            user_id: user_id.to_string(),
            text: "Looks delicious".to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_reply(id: &str, comment_id: &str, user_id: &str) -> reply::Model {
        reply::Model {
            id: id.to_string(),
            comment_id: comment_id.to_string(),
            user_id: user_id.to_string(),
            text: "Agreed".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_under_recipe_found() {
        let comment = create_test_comment("c1", "r1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment.clone()]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.get_under_recipe("r1", "c1").await.unwrap();

        assert_eq!(result.id, "c1");
        assert_eq!(result.recipe_id, "r1");
    }

    #[tokio::test]
    async fn test_get_under_wrong_recipe_not_found() {
        // Scoped query returns nothing when the comment belongs elsewhere
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.get_under_recipe("other", "c1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_recipe_insertion_order() {
        let c1 = create_test_comment("c1", "r1", "user1");
        let c2 = create_test_comment("c2", "r1", "user2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_by_recipe("r1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "c1");
    }

    #[tokio::test]
    async fn test_get_reply_under_comment_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<reply::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.get_reply_under_comment("c1", "missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_replies() {
        let r1 = create_test_reply("p1", "c1", "user2");
        let r2 = create_test_reply("p2", "c1", "user3");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_replies("c1").await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
