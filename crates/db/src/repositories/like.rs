//! Like repository for recipe, comment and reply likes.
//!
//! Likes are membership rows. A toggle finds the row for the
//! (user, target) pair and inserts or deletes it; counts are always
//! `COUNT(*)` over the rows so no stored integer can drift.

use std::sync::Arc;

use crate::entities::{
    comment_like, recipe_like, reply_like, CommentLike, RecipeLike, ReplyLike,
};
use savora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ========== Recipe likes ==========

    /// Find a recipe like by (user, recipe).
    pub async fn find_recipe_like(
        &self,
        user_id: &str,
        recipe_id: &str,
    ) -> AppResult<Option<recipe_like::Model>> {
        RecipeLike::find()
            .filter(recipe_like::Column::UserId.eq(user_id))
            .filter(recipe_like::Column::RecipeId.eq(recipe_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a recipe like row.
    pub async fn create_recipe_like(
        &self,
        model: recipe_like::ActiveModel,
    ) -> AppResult<recipe_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a recipe like row.
    pub async fn delete_recipe_like(&self, like: recipe_like::Model) -> AppResult<()> {
        like.delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count likes on a recipe.
    pub async fn count_recipe_likes(&self, recipe_id: &str) -> AppResult<u64> {
        RecipeLike::find()
            .filter(recipe_like::Column::RecipeId.eq(recipe_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ========== Comment likes ==========

    /// Find a comment like by (user, comment).
    pub async fn find_comment_like(
        &self,
        user_id: &str,
        comment_id: &str,
    ) -> AppResult<Option<comment_like::Model>> {
        CommentLike::find()
            .filter(comment_like::Column::UserId.eq(user_id))
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a comment like row.
    pub async fn create_comment_like(
        &self,
        model: comment_like::ActiveModel,
    ) -> AppResult<comment_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment like row.
    pub async fn delete_comment_like(&self, like: comment_like::Model) -> AppResult<()> {
        like.delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count likes on a comment.
    pub async fn count_comment_likes(&self, comment_id: &str) -> AppResult<u64> {
        CommentLike::find()
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ========== Reply likes ==========

    /// Find a reply like by (user, reply).
    pub async fn find_reply_like(
        &self,
        user_id: &str,
        reply_id: &str,
    ) -> AppResult<Option<reply_like::Model>> {
        ReplyLike::find()
            .filter(reply_like::Column::UserId.eq(user_id))
            .filter(reply_like::Column::ReplyId.eq(reply_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a reply like row.
    pub async fn create_reply_like(
        &self,
        model: reply_like::ActiveModel,
    ) -> AppResult<reply_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a reply like row.
    pub async fn delete_reply_like(&self, like: reply_like::Model) -> AppResult<()> {
        like.delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count likes on a reply.
    pub async fn count_reply_likes(&self, reply_id: &str) -> AppResult<u64> {
        ReplyLike::find()
            .filter(reply_like::Column::ReplyId.eq(reply_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
