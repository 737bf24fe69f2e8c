//! Plot observations and the feature vectors derived from them

use serde::{Deserialize, Serialize};

/// Inbound prediction request as received over the wire.
///
/// Every field is optional here; [`crate::validate_observation`] turns it
/// into a [`PlotObservation`] or reports the first missing field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub plot_id: Option<String>,
    #[serde(rename = "Rainfall")]
    pub rainfall: Option<f64>,
    #[serde(rename = "Temperature")]
    pub temperature: Option<f64>,
    #[serde(rename = "Nitrogen")]
    pub nitrogen: Option<f64>,
    #[serde(rename = "Phosphorus")]
    pub phosphorus: Option<f64>,
    #[serde(rename = "Potassium")]
    pub potassium: Option<f64>,
    #[serde(rename = "pH")]
    pub ph: Option<f64>,
    #[serde(rename = "Humidity")]
    pub humidity: Option<f64>,
    pub plot_size: Option<f64>,
    pub price: Option<f64>,
    pub crop: Option<String>,
}

/// A fully populated observation for one plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotObservation {
    pub plot_id: String,
    pub rainfall: f64,
    pub temperature: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
    pub humidity: f64,
    pub plot_size: f64,
    pub price: f64,
    /// Crop the farmer intends to grow
    pub crop: String,
}

impl PlotObservation {
    pub fn yield_features(&self) -> YieldFeatures {
        YieldFeatures::new(
            self.rainfall,
            self.temperature,
            self.nitrogen,
            self.phosphorus,
            self.potassium,
        )
    }

    pub fn recommendation_features(&self) -> RecommendationFeatures {
        RecommendationFeatures([
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ])
    }
}

/// Input of the yield models: (rainfall, temperature, nitrogen, phosphorus, potassium)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldFeatures(pub [f64; 5]);

impl YieldFeatures {
    pub fn new(rainfall: f64, temperature: f64, nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self([rainfall, temperature, nitrogen, phosphorus, potassium])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Input of the crop recommendation model:
/// (nitrogen, phosphorus, potassium, temperature, humidity, pH, rainfall)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationFeatures(pub [f64; 7]);

impl RecommendationFeatures {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
