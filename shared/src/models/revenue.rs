//! Revenue projection

use serde::{Deserialize, Serialize};

use super::suitability::SuitabilityFactor;

/// Projected revenue, one figure per yield model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueEstimate {
    pub linear: f64,
    pub ensemble: f64,
}

impl RevenueEstimate {
    pub fn project(
        linear_yield: f64,
        ensemble_yield: f64,
        plot_size: f64,
        price: f64,
        factor: SuitabilityFactor,
    ) -> Self {
        Self {
            linear: estimate_revenue(linear_yield, plot_size, price, factor.value()),
            ensemble: estimate_revenue(ensemble_yield, plot_size, price, factor.value()),
        }
    }
}

/// `yield × plot_size × price × factor`.
///
/// No domain checks: zero or negative sizes and prices flow through.
pub fn estimate_revenue(yield_prediction: f64, plot_size: f64, price: f64, suitability_factor: f64) -> f64 {
    yield_prediction * plot_size * price * suitability_factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate() {
        assert!((estimate_revenue(3.0, 2.0, 10.0, 0.7) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_inputs_propagate() {
        assert_eq!(estimate_revenue(3.0, -2.0, 10.0, 1.0), -60.0);
        assert_eq!(estimate_revenue(3.0, 2.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_project_applies_factor_to_both_yields() {
        let estimate = RevenueEstimate::project(3.0, 3.2, 2.0, 10.0, SuitabilityFactor::ExactMatch);
        assert_eq!(estimate.linear, 60.0);
        assert!((estimate.ensemble - 64.0).abs() < 1e-9);
    }
}
