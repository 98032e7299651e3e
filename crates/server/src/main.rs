//! Savora server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use savora_api::{middleware::AppState, router as api_router};
use savora_common::Config;
use savora_core::{
    CommentService, EngagementService, FollowingService, ModerationService, RecipeService,
    UserService,
};
use savora_db::repositories::{
    CommentRepository, FavoriteRepository, FollowingRepository, LikeRepository, RecipeRepository,
    ReportRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "savora=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting savora server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = savora_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    savora_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let following_repo = FollowingRepository::new(Arc::clone(&db));
    let recipe_repo = RecipeRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let favorite_repo = FavoriteRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let following_service = FollowingService::new(following_repo, user_repo.clone());
    let recipe_service = RecipeService::new(
        recipe_repo.clone(),
        comment_repo.clone(),
        like_repo.clone(),
        favorite_repo.clone(),
        user_repo.clone(),
    );
    let comment_service =
        CommentService::new(comment_repo.clone(), recipe_repo.clone(), user_repo.clone());
    let engagement_service = EngagementService::new(
        like_repo,
        favorite_repo,
        recipe_repo.clone(),
        comment_repo,
        user_repo.clone(),
    );
    let moderation_service = ModerationService::new(report_repo, user_repo, recipe_repo);

    // Create app state
    let state = AppState {
        user_service,
        following_service,
        recipe_service,
        comment_service,
        engagement_service,
        moderation_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            savora_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}
