//! Suitability of a declared crop against the model-recommended crop

use serde::{Deserialize, Serialize};

use super::crop::classify_crop;

/// Three-tier suitability multiplier.
///
/// Stored results carry the numeric value, so the tiers must stay at exactly
/// 1.0 / 0.9 / 0.7.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "f64", try_from = "f64")]
pub enum SuitabilityFactor {
    /// Declared crop is the recommended crop
    ExactMatch,
    /// Both crops fall in the same category (including both unclassified)
    SameCategory,
    DifferentCategory,
}

impl SuitabilityFactor {
    pub fn value(&self) -> f64 {
        match self {
            SuitabilityFactor::ExactMatch => 1.0,
            SuitabilityFactor::SameCategory => 0.9,
            SuitabilityFactor::DifferentCategory => 0.7,
        }
    }
}

impl From<SuitabilityFactor> for f64 {
    fn from(factor: SuitabilityFactor) -> Self {
        factor.value()
    }
}

impl TryFrom<f64> for SuitabilityFactor {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        [
            SuitabilityFactor::ExactMatch,
            SuitabilityFactor::SameCategory,
            SuitabilityFactor::DifferentCategory,
        ]
        .into_iter()
        .find(|factor| factor.value() == value)
        .ok_or_else(|| format!("{} is not a suitability factor", value))
    }
}

impl std::fmt::Display for SuitabilityFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.value())
    }
}

/// Compare the farmer's crop with the recommended one.
///
/// Order matters: name equality is checked before categories.
pub fn evaluate_suitability(declared_crop: &str, recommended_crop: &str) -> SuitabilityFactor {
    if declared_crop.to_lowercase() == recommended_crop.to_lowercase() {
        return SuitabilityFactor::ExactMatch;
    }

    if classify_crop(declared_crop) == classify_crop(recommended_crop) {
        SuitabilityFactor::SameCategory
    } else {
        SuitabilityFactor::DifferentCategory
    }
}
