//! Error handling for the crop advisory service
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::MissingField;
use thiserror::Error;

use crate::external::ModelInvocationError;
use crate::services::prediction_store::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error(transparent)]
    MissingField(#[from] MissingField),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Prediction for plot {plot_id} is not a finite number")]
    NonFiniteResult { plot_id: String },

    // External service errors
    #[error(transparent)]
    ModelInvocation(#[from] ModelInvocationError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::MissingField(missing) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "MISSING_FIELD".to_string(),
                    message: missing.to_string(),
                    field: Some(missing.field.to_string()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::NonFiniteResult { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "NON_FINITE_RESULT".to_string(),
                    message: self.to_string(),
                    field: None,
                },
            ),
            AppError::ModelInvocation(e) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "MODEL_INVOCATION_ERROR".to_string(),
                    message: e.to_string(),
                    field: None,
                },
            ),
            AppError::Storage(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "STORAGE_ERROR".to_string(),
                    message: "The prediction store is unavailable".to_string(),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Client mistakes are not server errors
        if status.is_client_error() {
            tracing::warn!("Request rejected: {}", self);
        } else {
            tracing::error!("Error: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
