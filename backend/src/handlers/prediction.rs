//! Prediction HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use shared::{PredictionRequest, PredictionResult};

use crate::error::{AppError, AppResult};
use crate::services::prediction_store::StoredPrediction;
use crate::services::recommendation::Recommendation;
use crate::services::{RecommendationFailure, RecommendationOutcome};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    /// `success`, or `degraded` when the result was not recorded
    pub status: &'static str,
    pub persisted: bool,
    pub plot_id: String,
    pub result: PredictionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl RecommendationResponse {
    fn recorded(recommendation: Recommendation) -> Self {
        Self {
            status: "success",
            persisted: true,
            plot_id: recommendation.plot_id,
            result: recommendation.result,
            warning: None,
        }
    }

    fn unrecorded(recommendation: Recommendation, reason: String) -> Self {
        Self {
            status: "degraded",
            persisted: false,
            plot_id: recommendation.plot_id,
            result: recommendation.result,
            warning: Some(format!("Result was not recorded: {}", reason)),
        }
    }
}

/// Run the full recommendation for one plot
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Response {
    match state.engine.recommend(&request).await {
        RecommendationOutcome::Success(recommendation) => (
            StatusCode::OK,
            Json(RecommendationResponse::recorded(recommendation)),
        )
            .into_response(),
        RecommendationOutcome::Failed(RecommendationFailure::PersistenceError {
            recommendation,
            reason,
        }) => (
            StatusCode::OK,
            Json(RecommendationResponse::unrecorded(recommendation, reason.to_string())),
        )
            .into_response(),
        RecommendationOutcome::Failed(RecommendationFailure::MissingField(missing)) => {
            AppError::from(missing).into_response()
        }
        RecommendationOutcome::Failed(RecommendationFailure::ModelError(e)) => {
            AppError::from(e).into_response()
        }
        RecommendationOutcome::Failed(RecommendationFailure::NonFiniteResult { plot_id }) => {
            AppError::NonFiniteResult { plot_id }.into_response()
        }
    }
}

/// Yield estimates only, nothing recorded
pub async fn forecast_yield(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> AppResult<impl IntoResponse> {
    let forecast = state.engine.forecast_yield(&request).await?;
    Ok(Json(json!({ "response": forecast })))
}

/// Get the stored prediction for a plot
pub async fn get_prediction(
    State(state): State<AppState>,
    Path(plot_id): Path<String>,
) -> AppResult<Json<StoredPrediction>> {
    state
        .engine
        .store()
        .fetch(&plot_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Prediction for plot {}", plot_id)))
}
