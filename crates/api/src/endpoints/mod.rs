//! API endpoints.

mod admin;
mod comments;
mod recipes;
mod reports;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/recipes", recipes::router())
        .nest("/comments", comments::router())
        .nest("/users", users::router())
        .nest("/reports", reports::router())
        .nest("/admin", admin::router())
}
