//! Prediction results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::revenue::RevenueEstimate;
use super::suitability::SuitabilityFactor;

/// Yield estimates from the two yield models
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldForecast {
    #[serde(rename = "linear_prediction")]
    pub linear: f64,
    /// Ensemble (random forest) estimate
    #[serde(rename = "rfr_prediction")]
    pub ensemble: f64,
}

/// Outcome of one recommendation request. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(flatten)]
    pub yields: YieldForecast,
    pub recommended_crop: String,
    pub suitability_factor: SuitabilityFactor,
    pub estimated_revenue: RevenueEstimate,
}

impl PredictionResult {
    /// Field mapping handed to the prediction store
    pub fn to_fields(&self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            other => Err(serde::ser::Error::custom(format!(
                "prediction result serialized to {} instead of an object",
                other
            ))),
        }
    }

    /// False when any yield or revenue figure is NaN or infinite.
    ///
    /// JSON has no representation for those, so such a result would be
    /// written as `null`.
    pub fn is_finite(&self) -> bool {
        [
            self.yields.linear,
            self.yields.ensemble,
            self.estimated_revenue.linear,
            self.estimated_revenue.ensemble,
        ]
        .iter()
        .all(|value| value.is_finite())
    }
}
