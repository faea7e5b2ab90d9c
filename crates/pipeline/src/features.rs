//! Prediction request and feature vector assembly
//!
//! A request carries nine fields. Normalization and encoding turn them
//! into the fixed-order numeric vector the model consumes: categorical
//! fields become encoder codes, boolean-like fields become 0/1, numeric
//! fields pass through unchanged.

use crate::artifact::ModelArtifact;
use crate::errors::{PipelineError, Result};
use crate::normalize::{parse_flag, title_case};
use serde::{Deserialize, Serialize};

/// Number of model input columns
pub const FEATURE_COUNT: usize = 9;

/// Required request keys, in model column order
pub const REQUIRED_FIELDS: [&str; FEATURE_COUNT] = [
    "Region",
    "Soil_Type",
    "Crop",
    "Rainfall_mm",
    "Temperature_Celsius",
    "Fertilizer_Used",
    "Irrigation_Used",
    "Weather_Condition",
    "Days_to_Harvest",
];

/// One prediction request, as received on the wire.
///
/// Numeric bounds (rainfall >= 0, temperature -10..50, days 30..365) are
/// advisory: out-of-range values are passed through to the model
/// unchanged rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Soil_Type")]
    pub soil_type: String,
    #[serde(rename = "Crop")]
    pub crop: String,
    #[serde(rename = "Rainfall_mm")]
    pub rainfall_mm: f64,
    #[serde(rename = "Temperature_Celsius")]
    pub temperature_celsius: f64,
    #[serde(rename = "Fertilizer_Used")]
    pub fertilizer_used: String,
    #[serde(rename = "Irrigation_Used")]
    pub irrigation_used: String,
    #[serde(rename = "Weather_Condition")]
    pub weather_condition: String,
    #[serde(rename = "Days_to_Harvest")]
    pub days_to_harvest: i64,
}

/// Fixed-order model input: Region, Soil_Type, Crop, Rainfall_mm,
/// Temperature_Celsius, Fertilizer_Used, Irrigation_Used,
/// Weather_Condition, Days_to_Harvest.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Required keys absent from a raw JSON request body, in canonical order.
///
/// Runs against the untyped body so the handler can report missing keys
/// before any deserialization or pipeline work happens.
pub fn missing_fields(body: &serde_json::Value) -> Vec<&'static str> {
    match body.as_object() {
        Some(map) => REQUIRED_FIELDS
            .iter()
            .filter(|field| !map.contains_key(**field))
            .copied()
            .collect(),
        None => REQUIRED_FIELDS.to_vec(),
    }
}

/// Normalize and encode a request into the model's feature vector.
///
/// Boolean-like fields are resolved first: if either fails to map, the
/// request is rejected before any encoder lookup runs. Encoder lookups
/// short-circuit on the first unknown value, so no partial vector is
/// ever scored.
pub fn build_features(
    artifact: &ModelArtifact,
    request: &PredictionRequest,
) -> Result<FeatureVector> {
    let fertilizer = parse_flag(&request.fertilizer_used);
    let irrigation = parse_flag(&request.irrigation_used);
    let (fertilizer, irrigation) = match (fertilizer, irrigation) {
        (Some(f), Some(i)) => (f, i),
        _ => {
            return Err(PipelineError::Validation(
                "Fertilizer_Used and Irrigation_Used must be 'TRUE' or 'FALSE' \
                 (case insensitive)"
                    .to_string(),
            ))
        }
    };

    let region = artifact
        .region_encoder
        .transform(&title_case(&request.region))?;
    let soil_type = artifact
        .soil_encoder
        .transform(&title_case(&request.soil_type))?;
    let crop = artifact.crop_encoder.transform(&title_case(&request.crop))?;
    let weather = artifact
        .weather_encoder
        .transform(&title_case(&request.weather_condition))?;

    Ok([
        region as f64,
        soil_type as f64,
        crop as f64,
        request.rainfall_mm,
        request.temperature_celsius,
        f64::from(fertilizer),
        f64::from(irrigation),
        weather as f64,
        request.days_to_harvest as f64,
    ])
}
