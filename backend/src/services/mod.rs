//! Business logic services for the crop advisory service

pub mod prediction_store;
pub mod recommendation;

pub use prediction_store::{InMemoryPredictionStore, PgPredictionStore, PredictionStore};
pub use recommendation::{RecommendationEngine, RecommendationFailure, RecommendationOutcome};
