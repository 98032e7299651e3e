//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use savora_core::{
    CommentService, EngagementService, FollowingService, ModerationService, RecipeService,
    UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub following_service: FollowingService,
    pub recipe_service: RecipeService,
    pub comment_service: CommentService,
    pub engagement_service: EngagementService,
    pub moderation_service: ModerationService,
}

/// Authentication middleware.
///
/// Resolves a `Authorization: Bearer <token>` header to a `user::Model`
/// and stashes it in request extensions; handlers that need an identity
/// pull it back out through the `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        if let Ok(user) = state.user_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}
