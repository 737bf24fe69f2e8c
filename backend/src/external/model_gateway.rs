//! Model Gateway
//!
//! Adapter over the three trained models: linear yield regression, ensemble
//! (random forest) yield regression and the crop recommendation classifier.
//! The models are served by a separate model-serving API and are opaque to
//! this service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{RecommendationFeatures, YieldFeatures};
use thiserror::Error;

use crate::config::ModelsConfig;

/// Failure to obtain a prediction from a model
#[derive(Debug, Error)]
pub enum ModelInvocationError {
    #[error("Model {model} is unavailable: {reason}")]
    Unavailable { model: String, reason: String },

    #[error("Model {model} rejected the request ({status}): {body}")]
    Rejected {
        model: String,
        status: u16,
        body: String,
    },

    #[error("Model {model} returned a malformed response: {reason}")]
    MalformedResponse { model: String, reason: String },
}

/// The three predictions the recommendation engine needs.
///
/// Implementations must surface failures; a default value in place of a
/// failed prediction is never acceptable.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn predict_yield_linear(&self, features: &YieldFeatures) -> Result<f64, ModelInvocationError>;

    async fn predict_yield_ensemble(&self, features: &YieldFeatures) -> Result<f64, ModelInvocationError>;

    async fn predict_recommended_crop(
        &self,
        features: &RecommendationFeatures,
    ) -> Result<String, ModelInvocationError>;
}

/// Client for a model-serving API speaking the `:predict` protocol
#[derive(Clone)]
pub struct RemoteModelGateway {
    endpoint: String,
    api_key: Option<String>,
    linear_model: String,
    ensemble_model: String,
    recommendation_model: String,
    http_client: Client,
}

/// Request body: one instance per call
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [&'a [f64]; 1],
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<Value>,
}

impl RemoteModelGateway {
    /// Create a gateway from the models configuration
    pub fn new(config: &ModelsConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            linear_model: config.linear_model.clone(),
            ensemble_model: config.ensemble_model.clone(),
            recommendation_model: config.recommendation_model.clone(),
            http_client,
        })
    }

    fn predict_url(&self, model: &str) -> String {
        format!("{}/v1/models/{}:predict", self.endpoint, model)
    }

    /// Send one feature vector to a model and return its single prediction
    async fn invoke(&self, model: &str, features: &[f64]) -> Result<Value, ModelInvocationError> {
        let mut request = self
            .http_client
            .post(self.predict_url(model))
            .json(&PredictRequest {
                instances: [features],
            });
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ModelInvocationError::Unavailable {
                model: model.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ModelInvocationError::Rejected {
                model: model.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body: PredictResponse =
            response
                .json()
                .await
                .map_err(|e| ModelInvocationError::MalformedResponse {
                    model: model.to_string(),
                    reason: format!("Failed to parse response: {}", e),
                })?;

        single_prediction(model, body)
    }
}

fn single_prediction(model: &str, body: PredictResponse) -> Result<Value, ModelInvocationError> {
    let count = body.predictions.len();
    match <[Value; 1]>::try_from(body.predictions) {
        Ok([prediction]) => Ok(prediction),
        Err(_) => Err(ModelInvocationError::MalformedResponse {
            model: model.to_string(),
            reason: format!("expected 1 prediction, got {}", count),
        }),
    }
}

fn as_number(model: &str, value: Value) -> Result<f64, ModelInvocationError> {
    value
        .as_f64()
        .ok_or_else(|| ModelInvocationError::MalformedResponse {
            model: model.to_string(),
            reason: format!("expected a number, got {}", value),
        })
}

fn as_label(model: &str, value: Value) -> Result<String, ModelInvocationError> {
    match value {
        Value::String(label) => Ok(label),
        other => Err(ModelInvocationError::MalformedResponse {
            model: model.to_string(),
            reason: format!("expected a crop label, got {}", other),
        }),
    }
}

#[async_trait]
impl ModelGateway for RemoteModelGateway {
    async fn predict_yield_linear(&self, features: &YieldFeatures) -> Result<f64, ModelInvocationError> {
        let value = self.invoke(&self.linear_model, features.as_slice()).await?;
        as_number(&self.linear_model, value)
    }

    async fn predict_yield_ensemble(&self, features: &YieldFeatures) -> Result<f64, ModelInvocationError> {
        let value = self.invoke(&self.ensemble_model, features.as_slice()).await?;
        as_number(&self.ensemble_model, value)
    }

    async fn predict_recommended_crop(
        &self,
        features: &RecommendationFeatures,
    ) -> Result<String, ModelInvocationError> {
        let value = self
            .invoke(&self.recommendation_model, features.as_slice())
            .await?;
        as_label(&self.recommendation_model, value)
    }
}
