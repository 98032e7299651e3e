//! Recipe endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use savora_common::AppResult;
use savora_core::{CommentDetail, CreateRecipeInput, IngredientInput, RecipeDetail, ReplyDetail};
use savora_db::entities::recipe;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// Recipe response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub views: i64,
    pub created_at: String,
}

impl From<recipe::Model> for RecipeResponse {
    fn from(recipe: recipe::Model) -> Self {
        Self {
            id: recipe.id,
            user_id: recipe.user_id,
            title: recipe.title,
            description: recipe.description,
            category_id: recipe.category_id,
            views: recipe.views,
            created_at: recipe.created_at.to_rfc3339(),
        }
    }
}

/// Ingredient line in a recipe aggregate.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResponse {
    pub id: String,
    pub name: String,
    pub quantity: Option<String>,
    pub position: i32,
}

/// Reply in a recipe aggregate.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub like_count: u64,
    pub created_at: String,
}

impl From<ReplyDetail> for ReplyResponse {
    fn from(detail: ReplyDetail) -> Self {
        Self {
            id: detail.reply.id,
            user_id: detail.reply.user_id,
            text: detail.reply.text,
            like_count: detail.like_count,
            created_at: detail.reply.created_at.to_rfc3339(),
        }
    }
}

/// Comment in a recipe aggregate.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub like_count: u64,
    pub replies: Vec<ReplyResponse>,
    pub created_at: String,
}

impl From<CommentDetail> for CommentResponse {
    fn from(detail: CommentDetail) -> Self {
        Self {
            id: detail.comment.id,
            user_id: detail.comment.user_id,
            text: detail.comment.text,
            like_count: detail.like_count,
            replies: detail.replies.into_iter().map(Into::into).collect(),
            created_at: detail.comment.created_at.to_rfc3339(),
        }
    }
}

/// Full recipe aggregate response: the row plus everything derived from
/// membership tables at read time.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetailResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub views: i64,
    pub like_count: u64,
    pub favorite_count: u64,
    pub ingredients: Vec<IngredientResponse>,
    pub comments: Vec<CommentResponse>,
    pub created_at: String,
}

impl From<RecipeDetail> for RecipeDetailResponse {
    fn from(detail: RecipeDetail) -> Self {
        Self {
            id: detail.recipe.id,
            user_id: detail.recipe.user_id,
            title: detail.recipe.title,
            description: detail.recipe.description,
            category_id: detail.recipe.category_id,
            views: detail.recipe.views,
            like_count: detail.like_count,
            favorite_count: detail.favorite_count,
            ingredients: detail
                .ingredients
                .into_iter()
                .map(|i| IngredientResponse {
                    id: i.id,
                    name: i.name,
                    quantity: i.quantity,
                    position: i.position,
                })
                .collect(),
            comments: detail.comments.into_iter().map(Into::into).collect(),
            created_at: detail.recipe.created_at.to_rfc3339(),
        }
    }
}

/// Create recipe request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientRequest>,
}

/// One ingredient line in a create request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequest {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
}

/// Create a recipe.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRecipeRequest>,
) -> AppResult<ApiResponse<RecipeResponse>> {
    let recipe = state
        .recipe_service
        .create_recipe(
            &user.id,
            CreateRecipeInput {
                title: req.title,
                description: req.description,
                category_id: req.category_id,
                ingredients: req
                    .ingredients
                    .into_iter()
                    .map(|i| IngredientInput {
                        name: i.name,
                        quantity: i.quantity,
                    })
                    .collect(),
            },
        )
        .await?;

    Ok(ApiResponse::ok(recipe.into()))
}

/// Get a recipe aggregate. Every fetch records a view.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RecipeDetailResponse>> {
    state.recipe_service.record_view(&id).await?;
    let detail = state.recipe_service.get_detail(&id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Like toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecipeRequest {
    pub recipe_id: String,
}

/// Toggle a like on a recipe. Returns the updated aggregate.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeRecipeRequest>,
) -> AppResult<ApiResponse<RecipeDetailResponse>> {
    state
        .engagement_service
        .toggle_recipe_like(&user.id, &req.recipe_id)
        .await?;

    let detail = state.recipe_service.get_detail(&req.recipe_id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Delete recipe request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecipeRequest {
    pub recipe_id: String,
}

/// Delete a recipe (author or admin).
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteRecipeRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .recipe_service
        .delete_recipe(&user.id, &req.recipe_id)
        .await?;
    Ok(ApiResponse::<()>::message("Recipe deleted"))
}

/// Create the recipes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/delete", post(delete))
        .route("/like", post(like))
        .route("/{id}", get(show))
}
