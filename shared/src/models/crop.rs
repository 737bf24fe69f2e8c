//! Crop taxonomy
//!
//! A closed, compiled-in grouping of crop names. Categories are used only to
//! judge how close a declared crop is to a recommended one, never as model
//! input.

use serde::{Deserialize, Serialize};

/// Category a crop belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CropCategory {
    Cereals,
    Legumes,
    Fruits,
    CashCrops,
    /// Crop name not present in any category
    Unclassified,
}

impl CropCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropCategory::Cereals => "cereals",
            CropCategory::Legumes => "legumes",
            CropCategory::Fruits => "fruits",
            CropCategory::CashCrops => "cash_crops",
            CropCategory::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for CropCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Crops per category, lowercase.
///
/// Names follow the labels emitted by the crop recommendation model.
pub const CROP_TAXONOMY: &[(CropCategory, &[&str])] = &[
    (CropCategory::Cereals, &["rice", "maize"]),
    (
        CropCategory::Legumes,
        &[
            "chickpea",
            "kidneybeans",
            "pigeonpeas",
            "mothbeans",
            "mungbean",
            "blackgram",
            "lentil",
        ],
    ),
    (
        CropCategory::Fruits,
        &[
            "pomegranate",
            "banana",
            "mango",
            "grapes",
            "watermelon",
            "muskmelon",
            "apple",
            "orange",
            "papaya",
            "coconut",
        ],
    ),
    (CropCategory::CashCrops, &["cotton", "jute", "coffee"]),
];

/// Classify a crop name (case-insensitive). Unknown names are `Unclassified`.
pub fn classify_crop(crop_name: &str) -> CropCategory {
    let name = crop_name.to_lowercase();
    CROP_TAXONOMY
        .iter()
        .find(|(_, crops)| crops.contains(&name.as_str()))
        .map(|(category, _)| *category)
        .unwrap_or(CropCategory::Unclassified)
}
