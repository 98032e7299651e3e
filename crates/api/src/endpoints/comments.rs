//! Comment endpoints.
//!
//! Mutations here respond with the updated recipe aggregate so the
//! client can re-render the whole comment tree from one payload.

use axum::{extract::State, routing::post, Router};
use savora_common::AppResult;
use serde::Deserialize;

use crate::{
    endpoints::recipes::RecipeDetailResponse,
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// Create comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub recipe_id: String,
    pub text: String,
}

/// Add a comment to a recipe.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<ApiResponse<RecipeDetailResponse>> {
    state
        .comment_service
        .add_comment(&user.id, &req.recipe_id, &req.text)
        .await?;

    let detail = state.recipe_service.get_detail(&req.recipe_id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Delete comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentRequest {
    pub recipe_id: String,
    pub comment_id: String,
}

/// Delete a comment (author or admin); replies and likes cascade.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteCommentRequest>,
) -> AppResult<ApiResponse<RecipeDetailResponse>> {
    state
        .comment_service
        .delete_comment(&user.id, &req.recipe_id, &req.comment_id)
        .await?;

    let detail = state.recipe_service.get_detail(&req.recipe_id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Reply request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyRequest {
    pub recipe_id: String,
    pub comment_id: String,
    pub text: String,
}

/// Reply to a comment.
async fn reply(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReplyRequest>,
) -> AppResult<ApiResponse<RecipeDetailResponse>> {
    state
        .comment_service
        .add_reply(&user.id, &req.recipe_id, &req.comment_id, &req.text)
        .await?;

    let detail = state.recipe_service.get_detail(&req.recipe_id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Comment like request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeCommentRequest {
    pub recipe_id: String,
    pub comment_id: String,
}

/// Toggle a like on a comment.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeCommentRequest>,
) -> AppResult<ApiResponse<RecipeDetailResponse>> {
    state
        .engagement_service
        .toggle_comment_like(&user.id, &req.recipe_id, &req.comment_id)
        .await?;

    let detail = state.recipe_service.get_detail(&req.recipe_id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Reply like request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeReplyRequest {
    pub recipe_id: String,
    pub comment_id: String,
    pub reply_id: String,
}

/// Toggle a like on a reply.
async fn like_reply(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeReplyRequest>,
) -> AppResult<ApiResponse<RecipeDetailResponse>> {
    state
        .engagement_service
        .toggle_reply_like(&user.id, &req.recipe_id, &req.comment_id, &req.reply_id)
        .await?;

    let detail = state.recipe_service.get_detail(&req.recipe_id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Create the comments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/delete", post(delete))
        .route("/reply", post(reply))
        .route("/like", post(like))
        .route("/replies/like", post(like_reply))
}
