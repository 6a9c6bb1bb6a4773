use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{health, profile, teams, todos};
use crate::services::TeamCache;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub team_cache: Arc<TeamCache>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let team_cache = Arc::new(TeamCache::new(
        config.cache.capacity,
        config.cache.team_ttl_secs,
    ));

    let state = AppState {
        pool,
        config: config.clone(),
        team_cache,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authenticated routes; each handler takes the UserAuth extractor
    let api_routes = Router::new()
        // Team routes (v1)
        .route("/api/v1/teams", post(teams::create_team))
        .route("/api/v1/teams", get(teams::list_teams))
        .route("/api/v1/teams/join", post(teams::join_team))
        .route("/api/v1/teams/:slug", get(teams::get_team))
        .route("/api/v1/teams/:slug", delete(teams::delete_team))
        .route("/api/v1/teams/:slug/name", put(teams::rename_team))
        .route(
            "/api/v1/teams/:slug/identifier",
            put(teams::change_identifier),
        )
        .route(
            "/api/v1/teams/:slug/members/:username/accept",
            post(teams::accept_member),
        )
        .route(
            "/api/v1/teams/:slug/members/:username",
            delete(teams::remove_member),
        )
        .route("/api/v1/teams/:slug/membership", delete(teams::leave_team))
        // To-do routes (v1)
        .route("/api/v1/todos", get(todos::list_todos))
        // Profile routes (v1)
        .route("/api/v1/profile", get(profile::get_profile))
        .route("/api/v1/profile", put(profile::update_profile));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
