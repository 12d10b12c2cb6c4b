//! Devsite - Content API for a company website

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devsite::{
    api::{self, AppState, RequestStats},
    config::Config,
    db::{
        self,
        repositories::{SqlxArticleRepository, SqlxPositionRepository},
    },
    services::{ArticleService, PositionService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devsite=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Devsite API...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!(
        related_scope = ?config.articles.related_scope,
        "Configuration loaded"
    );

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    let applied = db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed ({} applied)", applied);

    // Create repositories
    let article_repo = SqlxArticleRepository::boxed(pool.clone());
    let position_repo = SqlxPositionRepository::boxed(pool.clone());

    // Initialize services
    let article_service = Arc::new(ArticleService::with_config(
        article_repo,
        config.articles.clone(),
    ));
    let position_service = Arc::new(PositionService::new(position_repo));

    // Build application state
    let state = AppState {
        pool: pool.clone(),
        article_service,
        position_service,
        request_stats: Arc::new(RequestStats::new()),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolve on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
