//! Crop Advisory Service - Backend Server
//!
//! Turns field measurements into a crop recommendation, a suitability
//! judgement for the farmer's chosen crop, and yield and revenue
//! projections.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use crate::config::Config;

use crate::config::StorageBackend;
use crate::external::RemoteModelGateway;
use crate::services::{InMemoryPredictionStore, PgPredictionStore, PredictionStore, RecommendationEngine};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: RecommendationEngine,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cra_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Crop Advisory Server");
    tracing::info!("Environment: {}", config.environment);

    let store = connect_store(&config).await?;

    tracing::info!(endpoint = %config.models.endpoint, "Using model serving API");
    let models = Arc::new(RemoteModelGateway::new(&config.models)?);

    // Create application state
    let state = AppState {
        engine: RecommendationEngine::new(models, store),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the prediction store selected by configuration
async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn PredictionStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory prediction store; results are lost on restart");
            Ok(Arc::new(InMemoryPredictionStore::new()))
        }
        StorageBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(&config.database.url)
                .await?;

            tracing::info!("Database connection established");

            // Run migrations in development
            if config.environment == "development" {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations").run(&db_pool).await?;
                tracing::info!("Migrations completed");
            }

            Ok(Arc::new(PgPredictionStore::new(db_pool)))
        }
    }
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .route("/ping", get(handlers::ping))
        .route("/test", get(handlers::self_test))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Crop Advisory API v1.0"
}
