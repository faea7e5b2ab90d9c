//! Crop yield prediction pipeline
//!
//! Turns one raw prediction request into a yield estimate with a
//! confidence label, using a model artifact trained offline.
//!
//! Modules:
//! - `normalize`: Free-text trimming, title-casing, and flag mapping
//! - `encoder`: Categorical vocabulary-to-integer lookup tables
//! - `features`: Request type and fixed-order feature vector assembly
//! - `model`: GBDT regression model evaluator
//! - `confidence`: Magnitude-based confidence bucketing
//! - `artifact`: Versioned model bundle loading and validation
//! - `errors`: Pipeline error taxonomy

pub mod artifact;
pub mod confidence;
pub mod encoder;
pub mod errors;
pub mod features;
pub mod model;
pub mod normalize;

pub use artifact::ModelArtifact;
pub use confidence::Confidence;
pub use encoder::CategoricalEncoder;
pub use errors::{PipelineError, Result};
pub use features::{
    build_features, missing_fields, FeatureVector, PredictionRequest, FEATURE_COUNT,
    REQUIRED_FIELDS,
};
pub use model::YieldModel;

/// Crate version string for metadata and health reports
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A completed prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted yield in tons per hectare, clamped to be non-negative
    pub yield_tons_per_hectare: f64,
    /// Confidence bucket derived from the clamped value
    pub confidence: Confidence,
}

/// Run the full pipeline for one request:
/// normalize, encode, assemble, score, clamp, classify.
///
/// Fails with `PipelineError::Validation` when the input cannot be
/// normalized or encoded, and `PipelineError::Processing` when scoring
/// itself fails. Either way the request fails whole; no partial
/// prediction is ever produced.
pub fn predict(artifact: &ModelArtifact, request: &PredictionRequest) -> Result<Prediction> {
    let features = build_features(artifact, request)?;
    let raw = artifact.model.score(&features)?;
    let clamped = raw.max(0.0);
    Ok(Prediction {
        yield_tons_per_hectare: clamped,
        confidence: Confidence::classify(clamped),
    })
}
