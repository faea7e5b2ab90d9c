//! Model artifact loading
//!
//! The trained model, its four categorical encoders, and training
//! metadata ship together as one versioned JSON bundle. The bundle is
//! loaded once at process start, validated structurally, and held
//! read-only for the process lifetime. A bundle that fails to load or
//! validate keeps the process from serving at all.

use crate::encoder::CategoricalEncoder;
use crate::errors::{PipelineError, Result};
use crate::model::YieldModel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// The complete, immutable model bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Human-readable model name, reported in prediction responses
    pub model_name: String,
    /// Artifact version string
    pub model_version: String,
    /// When the model was trained
    pub training_date: String,
    pub region_encoder: CategoricalEncoder,
    pub soil_encoder: CategoricalEncoder,
    pub crop_encoder: CategoricalEncoder,
    pub weather_encoder: CategoricalEncoder,
    pub model: YieldModel,
}

impl ModelArtifact {
    /// Parse and validate an artifact from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Load an artifact bundle from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::InvalidArtifact(format!(
                "cannot read model artifact {}: {e}",
                path.display()
            ))
        })?;
        let artifact = Self::from_json(&content)?;
        info!(
            model_name = %artifact.model_name,
            model_version = %artifact.model_version,
            "model artifact loaded"
        );
        Ok(artifact)
    }

    /// Structural validation of the model and every encoder.
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.region_encoder.validate()?;
        self.soil_encoder.validate()?;
        self.crop_encoder.validate()?;
        self.weather_encoder.validate()?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
