//! Recipe service.

use savora_common::{AppError, AppResult, IdGenerator};
use savora_db::{
    entities::{comment, ingredient, recipe, reply},
    repositories::{CommentRepository, FavoriteRepository, LikeRepository, RecipeRepository, UserRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// Input for creating a recipe.
pub struct CreateRecipeInput {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub ingredients: Vec<IngredientInput>,
}

/// One ingredient line in a recipe submission.
pub struct IngredientInput {
    pub name: String,
    pub quantity: Option<String>,
}

/// A reply with its derived like count.
#[derive(Debug, Serialize)]
pub struct ReplyDetail {
    #[serde(flatten)]
    pub reply: reply::Model,
    pub like_count: u64,
}

/// A comment with its replies and derived like count.
#[derive(Debug, Serialize)]
pub struct CommentDetail {
    #[serde(flatten)]
    pub comment: comment::Model,
    pub like_count: u64,
    pub replies: Vec<ReplyDetail>,
}

/// A recipe aggregate: the row plus everything derived from membership
/// tables. Counts are computed per request, never stored.
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: recipe::Model,
    pub like_count: u64,
    pub favorite_count: u64,
    pub ingredients: Vec<ingredient::Model>,
    pub comments: Vec<CommentDetail>,
}

/// Recipe service for business logic.
#[derive(Clone)]
pub struct RecipeService {
    recipe_repo: RecipeRepository,
    comment_repo: CommentRepository,
    like_repo: LikeRepository,
    favorite_repo: FavoriteRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl RecipeService {
    /// Create a new recipe service.
    #[must_use]
    pub const fn new(
        recipe_repo: RecipeRepository,
        comment_repo: CommentRepository,
        like_repo: LikeRepository,
        favorite_repo: FavoriteRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            recipe_repo,
            comment_repo,
            like_repo,
            favorite_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a recipe with its ingredient lines.
    pub async fn create_recipe(
        &self,
        author_id: &str,
        input: CreateRecipeInput,
    ) -> AppResult<recipe::Model> {
        let author = self.user_repo.get_by_id(author_id).await?;
        if !author.can_mutate() {
            return Err(AppError::Forbidden(
                "Account is banned or deactivated".to_string(),
            ));
        }

        let title = input.title.trim();
        if title.is_empty() || title.chars().count() > 200 {
            return Err(AppError::InvalidInput(
                "Title must be 1-200 characters".to_string(),
            ));
        }

        if let Some(description) = &input.description
            && description.chars().count() > 2000
        {
            return Err(AppError::InvalidInput(
                "Description cannot exceed 2000 characters".to_string(),
            ));
        }

        if let Some(category_id) = &input.category_id {
            if self
                .recipe_repo
                .find_category_by_id(category_id)
                .await?
                .is_none()
            {
                return Err(AppError::NotFound(format!(
                    "Category {category_id} not found"
                )));
            }
        }

        let model = recipe::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author_id.to_string()),
            title: Set(title.to_string()),
            description: Set(input.description),
            category_id: Set(input.category_id),
            views: Set(0),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };
        let created = self.recipe_repo.create(model).await?;

        for (index, line) in input.ingredients.into_iter().enumerate() {
            let name = line.name.trim();
            if name.is_empty() {
                continue;
            }
            let ingredient = ingredient::ActiveModel {
                id: Set(self.id_gen.generate()),
                recipe_id: Set(created.id.clone()),
                name: Set(name.to_string()),
                quantity: Set(line.quantity),
                position: Set(i32::try_from(index).unwrap_or(i32::MAX)),
            };
            self.recipe_repo.add_ingredient(ingredient).await?;
        }

        tracing::info!(recipe_id = %created.id, author_id, "Recipe created");
        Ok(created)
    }

    /// Get a recipe aggregate with derived counts and the full comment
    /// tree (two levels, oldest first at both levels).
    pub async fn get_detail(&self, recipe_id: &str) -> AppResult<RecipeDetail> {
        let recipe = self.recipe_repo.get_by_id(recipe_id).await?;

        let like_count = self.like_repo.count_recipe_likes(recipe_id).await?;
        let favorite_count = self.favorite_repo.count_by_recipe(recipe_id).await?;
        let ingredients = self.recipe_repo.find_ingredients(recipe_id).await?;

        let mut comments = Vec::new();
        for comment in self.comment_repo.find_by_recipe(recipe_id).await? {
            let comment_likes = self.like_repo.count_comment_likes(&comment.id).await?;

            let mut replies = Vec::new();
            for reply in self.comment_repo.find_replies(&comment.id).await? {
                let reply_likes = self.like_repo.count_reply_likes(&reply.id).await?;
                replies.push(ReplyDetail {
                    reply,
                    like_count: reply_likes,
                });
            }

            comments.push(CommentDetail {
                comment,
                like_count: comment_likes,
                replies,
            });
        }

        Ok(RecipeDetail {
            recipe,
            like_count,
            favorite_count,
            ingredients,
            comments,
        })
    }

    /// Record a view of a recipe. Monotonic, no dedup by viewer.
    pub async fn record_view(&self, recipe_id: &str) -> AppResult<()> {
        self.recipe_repo.get_by_id(recipe_id).await?;
        self.recipe_repo.increment_views(recipe_id).await
    }

    /// Delete a recipe. Only the author or an admin may do this; comment
    /// and membership rows go with it via FK cascade.
    pub async fn delete_recipe(&self, actor_id: &str, recipe_id: &str) -> AppResult<()> {
        let actor = self.user_repo.get_by_id(actor_id).await?;
        let recipe = self.recipe_repo.get_by_id(recipe_id).await?;

        if recipe.user_id != actor.id && !actor.is_admin {
            return Err(AppError::Forbidden(
                "Only the author or an admin can delete a recipe".to_string(),
            ));
        }

        self.recipe_repo.delete(recipe_id).await?;
        tracing::info!(recipe_id, actor_id, "Recipe deleted");
        Ok(())
    }

    /// List recipes by owner (paginated).
    pub async fn list_by_user(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<recipe::Model>> {
        self.user_repo.get_by_id(user_id).await?;
        self.recipe_repo.find_by_user(user_id, limit, until_id).await
    }
}
