//! Comment service.

use savora_common::{AppError, AppResult, IdGenerator};
use savora_db::{
    entities::{comment, reply},
    repositories::{CommentRepository, RecipeRepository, UserRepository},
};
use sea_orm::Set;

const MAX_COMMENT_LENGTH: usize = 500;
const MAX_REPLY_LENGTH: usize = 300;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    recipe_repo: RecipeRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        recipe_repo: RecipeRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            comment_repo,
            recipe_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn get_mutating_user(&self, user_id: &str) -> AppResult<savora_db::entities::user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        if !user.can_mutate() {
            return Err(AppError::Forbidden(
                "Account is banned or deactivated".to_string(),
            ));
        }
        Ok(user)
    }

    fn validate_text(text: &str, max: usize, what: &str) -> AppResult<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput(format!("{what} cannot be empty")));
        }
        // Unicode scalar values, not bytes
        if trimmed.chars().count() > max {
            return Err(AppError::InvalidInput(format!(
                "{what} cannot exceed {max} characters"
            )));
        }
        Ok(trimmed.to_string())
    }

    /// Add a top-level comment to a recipe.
    pub async fn add_comment(
        &self,
        author_id: &str,
        recipe_id: &str,
        text: &str,
    ) -> AppResult<comment::Model> {
        self.get_mutating_user(author_id).await?;
        self.recipe_repo.get_by_id(recipe_id).await?;

        let text = Self::validate_text(text, MAX_COMMENT_LENGTH, "Comment")?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            recipe_id: Set(recipe_id.to_string()),
            user_id: Set(author_id.to_string()),
            text: Set(text),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.comment_repo.create(model).await
    }

    /// Add a reply to a comment under a recipe.
    ///
    /// The comment must belong to the given recipe; replies to replies do
    /// not exist, so the tree never exceeds two levels.
    pub async fn add_reply(
        &self,
        author_id: &str,
        recipe_id: &str,
        comment_id: &str,
        text: &str,
    ) -> AppResult<reply::Model> {
        self.get_mutating_user(author_id).await?;
        self.recipe_repo.get_by_id(recipe_id).await?;
        self.comment_repo
            .get_under_recipe(recipe_id, comment_id)
            .await?;

        let text = Self::validate_text(text, MAX_REPLY_LENGTH, "Reply")?;

        let model = reply::ActiveModel {
            id: Set(self.id_gen.generate()),
            comment_id: Set(comment_id.to_string()),
            user_id: Set(author_id.to_string()),
            text: Set(text),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.comment_repo.create_reply(model).await
    }

    /// Delete a comment and, via FK cascade, its replies and likes.
    ///
    /// Allowed for the comment author and for admins.
    pub async fn delete_comment(
        &self,
        actor_id: &str,
        recipe_id: &str,
        comment_id: &str,
    ) -> AppResult<()> {
        let actor = self.user_repo.get_by_id(actor_id).await?;
        let comment = self
            .comment_repo
            .get_under_recipe(recipe_id, comment_id)
            .await?;

        if comment.user_id != actor.id && !actor.is_admin {
            return Err(AppError::Forbidden(
                "Only the author or an admin can delete a comment".to_string(),
            ));
        }

        self.comment_repo.delete(comment).await?;
        tracing::info!(comment_id, actor_id, "Comment deleted");
        Ok(())
    }

    /// List a recipe's comments, oldest first.
    pub async fn list_for_recipe(&self, recipe_id: &str) -> AppResult<Vec<comment::Model>> {
        self.recipe_repo.get_by_id(recipe_id).await?;
        self.comment_repo.find_by_recipe(recipe_id).await
    }
}
