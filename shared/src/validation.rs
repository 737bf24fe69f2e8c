//! Validation of inbound prediction requests
//!
//! Only presence is checked. Value ranges (negative rainfall, zero plot
//! size) are the caller's concern and pass through unchanged.

use thiserror::Error;

use crate::models::{PlotObservation, PredictionRequest, YieldFeatures};

/// A required request field was absent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required field: {field}")]
pub struct MissingField {
    /// Wire name of the field
    pub field: &'static str,
}

fn require<T: Clone>(value: &Option<T>, field: &'static str) -> Result<T, MissingField> {
    value.clone().ok_or(MissingField { field })
}

/// Validate that every field needed by the engine is present
pub fn validate_observation(request: &PredictionRequest) -> Result<PlotObservation, MissingField> {
    Ok(PlotObservation {
        plot_id: require(&request.plot_id, "plot_id")?,
        rainfall: require(&request.rainfall, "Rainfall")?,
        temperature: require(&request.temperature, "Temperature")?,
        nitrogen: require(&request.nitrogen, "Nitrogen")?,
        phosphorus: require(&request.phosphorus, "Phosphorus")?,
        potassium: require(&request.potassium, "Potassium")?,
        ph: require(&request.ph, "pH")?,
        humidity: require(&request.humidity, "Humidity")?,
        plot_size: require(&request.plot_size, "plot_size")?,
        price: require(&request.price, "price")?,
        crop: require(&request.crop, "crop")?,
    })
}

/// Validate only the fields the yield models consume
pub fn validate_yield_features(request: &PredictionRequest) -> Result<YieldFeatures, MissingField> {
    Ok(YieldFeatures::new(
        require(&request.rainfall, "Rainfall")?,
        require(&request.temperature, "Temperature")?,
        require(&request.nitrogen, "Nitrogen")?,
        require(&request.phosphorus, "Phosphorus")?,
        require(&request.potassium, "Potassium")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_request() -> PredictionRequest {
        PredictionRequest {
            plot_id: Some("plot-7".to_string()),
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

    #[test]
    fn test_complete_request_validates() {
        let observation = validate_observation(&complete_request()).unwrap();
        assert_eq!(observation.plot_id, "plot-7");
        assert_eq!(observation.ph, 6.5);
        assert_eq!(observation.crop, "wheat");
    }

    #[test]
    fn test_missing_ph() {
        let request = PredictionRequest {
            ph: None,
            ..complete_request()
        };
        assert_eq!(
            validate_observation(&request),
            Err(MissingField { field: "pH" })
        );
    }

    #[test]
    fn test_missing_plot_id() {
        let request = PredictionRequest {
            plot_id: None,
            ..complete_request()
        };
        assert_eq!(
            validate_observation(&request).unwrap_err().field,
            "plot_id"
        );
    }

    #[test]
    fn test_negative_values_accepted() {
        let request = PredictionRequest {
            rainfall: Some(-5.0),
            plot_size: Some(0.0),
            ..complete_request()
        };
        assert!(validate_observation(&request).is_ok());
    }

    #[test]
    fn test_yield_features_ignore_economic_fields() {
        let request = PredictionRequest {
            plot_size: None,
            price: None,
            crop: None,
            ..complete_request()
        };
        let features = validate_yield_features(&request).unwrap();
        assert_eq!(features.as_slice(), &[100.0, 25.0, 50.0, 20.0, 30.0]);
    }
}
