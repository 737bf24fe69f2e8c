//! Recommendation engine
//!
//! Drives one request through `Validate -> Predict -> Evaluate -> Persist`.
//! Every step either advances or ends the request with an explicit outcome;
//! nothing is retried here and no step is revisited.

use std::sync::Arc;

use shared::{
    evaluate_suitability, validate_observation, validate_yield_features, MissingField,
    PlotObservation, PredictionRequest, PredictionResult, RevenueEstimate, YieldForecast,
};

use crate::error::AppResult;
use crate::external::{ModelGateway, ModelInvocationError};
use crate::services::prediction_store::{PredictionStore, StoreError};

/// A computed result for one plot
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub plot_id: String,
    pub result: PredictionResult,
}

/// Terminal state of a recommendation request
#[derive(Debug)]
pub enum RecommendationOutcome {
    Success(Recommendation),
    Failed(RecommendationFailure),
}

#[derive(Debug)]
pub enum RecommendationFailure {
    /// Input incomplete; no model was invoked
    MissingField(MissingField),
    /// A model failed; no result was produced
    ModelError(ModelInvocationError),
    /// A yield or revenue figure came out NaN or infinite; nothing recorded
    NonFiniteResult { plot_id: String },
    /// The result was computed but not recorded
    PersistenceError {
        recommendation: Recommendation,
        reason: StoreError,
    },
}

impl RecommendationOutcome {
    /// The computed recommendation, if the request got that far
    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            RecommendationOutcome::Success(recommendation)
            | RecommendationOutcome::Failed(RecommendationFailure::PersistenceError {
                recommendation,
                ..
            }) => Some(recommendation),
            RecommendationOutcome::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RecommendationOutcome::Success(_))
    }
}

/// Raw model outputs for one observation
struct ModelPredictions {
    yields: YieldForecast,
    recommended_crop: String,
}

/// Orchestrates the model gateway, suitability evaluation, revenue
/// projection and persistence. Stateless across requests.
#[derive(Clone)]
pub struct RecommendationEngine {
    models: Arc<dyn ModelGateway>,
    store: Arc<dyn PredictionStore>,
}

impl RecommendationEngine {
    pub fn new(models: Arc<dyn ModelGateway>, store: Arc<dyn PredictionStore>) -> Self {
        Self { models, store }
    }

    pub fn store(&self) -> &Arc<dyn PredictionStore> {
        &self.store
    }

    /// Produce, persist and return a recommendation for one plot
    pub async fn recommend(&self, request: &PredictionRequest) -> RecommendationOutcome {
        let observation = match validate_observation(request) {
            Ok(observation) => observation,
            Err(missing) => {
                tracing::warn!(field = missing.field, "Rejecting prediction request");
                return RecommendationOutcome::Failed(RecommendationFailure::MissingField(missing));
            }
        };
        let plot_id = observation.plot_id.clone();
        tracing::debug!(plot_id = %plot_id, "Observation validated");

        let predictions = match self.predict(&observation).await {
            Ok(predictions) => predictions,
            Err(e) => {
                tracing::error!(plot_id = %plot_id, error = %e, "Model invocation failed");
                return RecommendationOutcome::Failed(RecommendationFailure::ModelError(e));
            }
        };
        tracing::debug!(
            plot_id = %plot_id,
            linear = predictions.yields.linear,
            ensemble = predictions.yields.ensemble,
            recommended_crop = %predictions.recommended_crop,
            "Models invoked"
        );

        let result = evaluate(&observation, predictions);
        tracing::debug!(
            plot_id = %plot_id,
            suitability_factor = result.suitability_factor.value(),
            "Result evaluated"
        );

        if !result.is_finite() {
            tracing::warn!(plot_id = %plot_id, "Result has a non-finite yield or revenue");
            return RecommendationOutcome::Failed(RecommendationFailure::NonFiniteResult { plot_id });
        }

        let recommendation = Recommendation { plot_id, result };
        let persisted = match recommendation.result.to_fields() {
            Ok(fields) => self.store.upsert(&recommendation.plot_id, fields).await,
            Err(e) => Err(StoreError::from(e)),
        };
        match persisted {
            Ok(()) => {
                tracing::info!(plot_id = %recommendation.plot_id, "Recommendation recorded");
                RecommendationOutcome::Success(recommendation)
            }
            Err(reason) => {
                tracing::warn!(
                    plot_id = %recommendation.plot_id,
                    error = %reason,
                    "Recommendation computed but not recorded"
                );
                RecommendationOutcome::Failed(RecommendationFailure::PersistenceError {
                    recommendation,
                    reason,
                })
            }
        }
    }

    /// Yield estimates only. Needs just the five yield features and
    /// records nothing.
    pub async fn forecast_yield(&self, request: &PredictionRequest) -> AppResult<YieldForecast> {
        let features = validate_yield_features(request)?;
        let (linear, ensemble) = tokio::try_join!(
            self.models.predict_yield_linear(&features),
            self.models.predict_yield_ensemble(&features),
        )?;
        Ok(YieldForecast { linear, ensemble })
    }

    async fn predict(&self, observation: &PlotObservation) -> Result<ModelPredictions, ModelInvocationError> {
        let yield_features = observation.yield_features();
        let recommendation_features = observation.recommendation_features();

        let (linear, ensemble, recommended_crop) = tokio::try_join!(
            self.models.predict_yield_linear(&yield_features),
            self.models.predict_yield_ensemble(&yield_features),
            self.models.predict_recommended_crop(&recommendation_features),
        )?;

        Ok(ModelPredictions {
            yields: YieldForecast { linear, ensemble },
            recommended_crop,
        })
    }
}

fn evaluate(observation: &PlotObservation, predictions: ModelPredictions) -> PredictionResult {
    let suitability_factor = evaluate_suitability(&observation.crop, &predictions.recommended_crop);
    let estimated_revenue = RevenueEstimate::project(
        predictions.yields.linear,
        predictions.yields.ensemble,
        observation.plot_size,
        observation.price,
        suitability_factor,
    );

    PredictionResult {
        yields: predictions.yields,
        recommended_crop: predictions.recommended_crop,
        suitability_factor,
        estimated_revenue,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::prediction_store::{Fields, InMemoryPredictionStore, StoredPrediction};
    use async_trait::async_trait;
    use shared::{RecommendationFeatures, SuitabilityFactor, YieldFeatures};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic gateway returning fixed predictions
    pub(crate) struct StubGateway {
        pub linear: f64,
        pub ensemble: f64,
        pub crop: String,
        pub fail: bool,
        pub calls: AtomicUsize,
    }

    impl StubGateway {
        pub(crate) fn new(linear: f64, ensemble: f64, crop: &str) -> Self {
            Self {
                linear,
                ensemble,
                crop: crop.to_string(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(0.0, 0.0, "")
            }
        }

        fn call(&self, model: &str) -> Result<(), ModelInvocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ModelInvocationError::Unavailable {
                    model: model.to_string(),
                    reason: "stub offline".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ModelGateway for StubGateway {
        async fn predict_yield_linear(&self, _: &YieldFeatures) -> Result<f64, ModelInvocationError> {
            self.call("linear_yield")?;
            Ok(self.linear)
        }

        async fn predict_yield_ensemble(&self, _: &YieldFeatures) -> Result<f64, ModelInvocationError> {
            self.call("ensemble_yield")?;
            Ok(self.ensemble)
        }

        async fn predict_recommended_crop(
            &self,
            _: &RecommendationFeatures,
        ) -> Result<String, ModelInvocationError> {
            self.call("crop_recommendation")?;
            Ok(self.crop.clone())
        }
    }

    /// Store whose writes always fail
    pub(crate) struct BrokenStore;

    #[async_trait]
    impl PredictionStore for BrokenStore {
        async fn upsert(&self, _: &str, _: Fields) -> Result<(), StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn fetch(&self, _: &str) -> Result<Option<StoredPrediction>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    pub(crate) fn wheat_request() -> PredictionRequest {
        PredictionRequest {
            plot_id: Some("plot-42".to_string()),
            rainfall: Some(100.0),
            temperature: Some(25.0),
            nitrogen: Some(50.0),
            phosphorus: Some(20.0),
            potassium: Some(30.0),
            ph: Some(6.5),
            humidity: Some(60.0),
            plot_size: Some(2.0),
            price: Some(10.0),
            crop: Some("wheat".to_string()),
        }
    }

    fn engine(gateway: Arc<StubGateway>, store: Arc<dyn PredictionStore>) -> RecommendationEngine {
        RecommendationEngine::new(gateway, store)
    }

    #[tokio::test]
    async fn test_end_to_end_wheat_against_rice() {
        let store = Arc::new(InMemoryPredictionStore::new());
        let engine = engine(Arc::new(StubGateway::new(3.0, 3.2, "rice")), store.clone());

        let outcome = engine.recommend(&wheat_request()).await;
        assert!(outcome.is_success());

        let recommendation = outcome.recommendation().unwrap();
        let result = &recommendation.result;
        assert_eq!(recommendation.plot_id, "plot-42");
        assert_eq!(result.recommended_crop, "rice");
        assert_eq!(result.suitability_factor, SuitabilityFactor::DifferentCategory);
        assert!((result.estimated_revenue.linear - 42.0).abs() < 1e-9);
        assert!((result.estimated_revenue.ensemble - 44.8).abs() < 1e-9);

        let stored = store.fetch("plot-42").await.unwrap().unwrap();
        assert_eq!(stored.fields, result.to_fields().unwrap());
    }

    #[tokio::test]
    async fn test_missing_ph_invokes_no_model() {
        let gateway = Arc::new(StubGateway::new(3.0, 3.2, "rice"));
        let store = Arc::new(InMemoryPredictionStore::new());
        let engine = engine(gateway.clone(), store.clone());

        let request = PredictionRequest {
            ph: None,
            ..wheat_request()
        };
        let outcome = engine.recommend(&request).await;

        match outcome {
            RecommendationOutcome::Failed(RecommendationFailure::MissingField(missing)) => {
                assert_eq!(missing.field, "pH");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert!(store.fetch("plot-42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_model_failure_produces_no_result() {
        let store = Arc::new(InMemoryPredictionStore::new());
        let engine = engine(Arc::new(StubGateway::failing()), store.clone());

        let outcome = engine.recommend(&wheat_request()).await;

        assert!(matches!(
            outcome,
            RecommendationOutcome::Failed(RecommendationFailure::ModelError(_))
        ));
        assert!(outcome.recommendation().is_none());
        assert!(store.fetch("plot-42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_result() {
        let engine = engine(Arc::new(StubGateway::new(3.0, 3.2, "rice")), Arc::new(BrokenStore));

        let outcome = engine.recommend(&wheat_request()).await;

        assert!(!outcome.is_success());
        assert!(matches!(
            outcome,
            RecommendationOutcome::Failed(RecommendationFailure::PersistenceError { .. })
        ));
        let recommendation = outcome.recommendation().unwrap();
        assert!((recommendation.result.estimated_revenue.linear - 42.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_overflowing_revenue_is_not_recorded() {
        let store = Arc::new(InMemoryPredictionStore::new());
        let engine = engine(Arc::new(StubGateway::new(1e300, 3.2, "rice")), store.clone());
        let request = PredictionRequest {
            plot_size: Some(1e300),
            ..wheat_request()
        };

        let outcome = engine.recommend(&request).await;

        match outcome {
            RecommendationOutcome::Failed(RecommendationFailure::NonFiniteResult { plot_id }) => {
                assert_eq!(plot_id, "plot-42");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(store.fetch("plot-42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exact_match_uses_full_factor() {
        let store = Arc::new(InMemoryPredictionStore::new());
        let engine = engine(Arc::new(StubGateway::new(3.0, 3.2, "Wheat")), store);

        let outcome = engine.recommend(&wheat_request()).await;
        let result = &outcome.recommendation().unwrap().result;

        assert_eq!(result.suitability_factor, SuitabilityFactor::ExactMatch);
        assert!((result.estimated_revenue.linear - 60.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_repeated_request_leaves_record_unchanged() {
        let store = Arc::new(InMemoryPredictionStore::new());
        let engine = engine(Arc::new(StubGateway::new(3.0, 3.2, "maize")), store.clone());

        engine.recommend(&wheat_request()).await;
        let first = store.fetch("plot-42").await.unwrap().unwrap();
        engine.recommend(&wheat_request()).await;
        let second = store.fetch("plot-42").await.unwrap().unwrap();

        assert_eq!(first.fields, second.fields);
    }

    #[test]
    fn test_forecast_yield_needs_only_yield_features() {
        let gateway = Arc::new(StubGateway::new(3.0, 3.2, "rice"));
        let engine = engine(gateway.clone(), Arc::new(BrokenStore));
        let request = PredictionRequest {
            plot_id: None,
            ph: None,
            humidity: None,
            plot_size: None,
            price: None,
            crop: None,
            ..wheat_request()
        };

        let forecast = tokio_test::block_on(engine.forecast_yield(&request)).unwrap();

        assert_eq!(forecast, YieldForecast { linear: 3.0, ensemble: 3.2 });
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_forecast_yield_missing_rainfall() {
        let engine = engine(Arc::new(StubGateway::new(3.0, 3.2, "rice")), Arc::new(BrokenStore));
        let request = PredictionRequest {
            rainfall: None,
            ..wheat_request()
        };

        let err = tokio_test::block_on(engine.forecast_yield(&request)).unwrap_err();
        assert!(matches!(err, crate::error::AppError::MissingField(MissingField { field: "Rainfall" })));
    }
}
