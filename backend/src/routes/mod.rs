//! Route definitions for the crop advisory service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/predict", predict_routes())
        .nest("/predictions", prediction_routes())
}

/// Prediction routes
fn predict_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::recommend))
        .route("/yield", post(handlers::forecast_yield))
}

/// Stored prediction routes
fn prediction_routes() -> Router<AppState> {
    Router::new().route("/:plot_id", get(handlers::get_prediction))
}
