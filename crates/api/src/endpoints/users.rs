//! User and social graph endpoints.

use axum::{extract::State, routing::post, Router};
use savora_common::AppResult;
use savora_core::RegisterUserInput;
use savora_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// User response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            is_admin: user.is_admin,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Register a new account.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .register(RegisterUserInput {
            username: req.username,
            email: req.email,
            display_name: req.display_name,
        })
        .await?;

    Ok(ApiResponse::ok(user.into()))
}

/// User profile request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowUserRequest {
    pub user_id: String,
}

/// User profile with derived social counts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub follower_count: u64,
    pub following_count: u64,
}

/// Get a user profile.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowUserRequest>,
) -> AppResult<ApiResponse<UserProfileResponse>> {
    let user = state.user_service.get_user(&req.user_id).await?;
    let follower_count = state.following_service.count_followers(&req.user_id).await?;
    let following_count = state.following_service.count_following(&req.user_id).await?;

    Ok(ApiResponse::ok(UserProfileResponse {
        user: user.into(),
        follower_count,
        following_count,
    }))
}

/// Follow toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub user_id: String,
}

/// Follow toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub following: bool,
}

/// Toggle following a user.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowResponse>> {
    let following = state
        .following_service
        .toggle(&user.id, &req.user_id)
        .await?;

    Ok(ApiResponse::ok(FollowResponse { following }))
}

/// Favorite toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub recipe_id: String,
}

/// Favorite toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub favorited: bool,
}

/// Toggle a recipe in the user's favorites.
async fn favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FavoriteRequest>,
) -> AppResult<ApiResponse<FavoriteResponse>> {
    let favorited = state
        .engagement_service
        .toggle_favorite(&user.id, &req.recipe_id)
        .await?;

    Ok(ApiResponse::ok(FavoriteResponse { favorited }))
}

/// Follower/following listing request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFollowRequest {
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    30
}

/// Follow edge response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdgeResponse {
    pub id: String,
    pub follower_id: String,
    pub followee_id: String,
    pub created_at: String,
}

impl From<savora_db::entities::following::Model> for FollowEdgeResponse {
    fn from(edge: savora_db::entities::following::Model) -> Self {
        Self {
            id: edge.id,
            follower_id: edge.follower_id,
            followee_id: edge.followee_id,
            created_at: edge.created_at.to_rfc3339(),
        }
    }
}

/// List a user's followers.
async fn followers(
    State(state): State<AppState>,
    Json(req): Json<ListFollowRequest>,
) -> AppResult<ApiResponse<Vec<FollowEdgeResponse>>> {
    let edges = state
        .following_service
        .get_followers(&req.user_id, req.limit.min(100), req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(edges.into_iter().map(Into::into).collect()))
}

/// List the users someone follows.
async fn following(
    State(state): State<AppState>,
    Json(req): Json<ListFollowRequest>,
) -> AppResult<ApiResponse<Vec<FollowEdgeResponse>>> {
    let edges = state
        .following_service
        .get_following(&req.user_id, req.limit.min(100), req.until_id.as_deref())
        .await?;

    Ok(ApiResponse::ok(edges.into_iter().map(Into::into).collect()))
}

/// Create the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/follow", post(follow))
        .route("/favorite", post(favorite))
        .route("/followers", post(followers))
        .route("/following", post(following))
}
