use anyhow::Result;
use tracing::info;

mod app;
mod config;
mod error;
mod extractors;
mod guard;
mod middleware;
mod routes;
mod services;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting Taskhive API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Prometheus metrics
    middleware::init_metrics();

    // Create database pool
    let db_config = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Build application
    let app = app::create_app(config.clone(), pool);

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
