//! Categorical encoders
//!
//! Each categorical field carries a fixed vocabulary learned at training
//! time. An encoder maps a title-cased vocabulary entry onto the integer
//! code the model was trained with; anything outside the vocabulary is a
//! validation failure.

use crate::errors::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// A fixed string-to-integer lookup table for one categorical field.
///
/// Codes follow vocabulary order, matching the assignment made by the
/// trainer. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoricalEncoder {
    /// Field this encoder belongs to (used in error messages)
    pub field: String,
    /// Vocabulary in code order: classes[i] encodes to i
    pub classes: Vec<String>,
}

impl CategoricalEncoder {
    pub fn new<S: Into<String>>(field: S, classes: Vec<String>) -> Self {
        Self {
            field: field.into(),
            classes,
        }
    }

    /// Encode an already-normalized value.
    ///
    /// Fails with a validation error naming the field and the attempted
    /// value when the value is outside the trained vocabulary.
    pub fn transform(&self, value: &str) -> Result<i64> {
        self.classes
            .iter()
            .position(|class| class == value)
            .map(|code| code as i64)
            .ok_or_else(|| {
                PipelineError::Validation(format!(
                    "unrecognized {} value \"{}\"; supported values: {}",
                    self.field,
                    value,
                    self.classes.join(", ")
                ))
            })
    }

    /// Vocabulary listing, in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Structural check used during artifact load.
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(PipelineError::InvalidArtifact(format!(
                "encoder for {} has an empty vocabulary",
                self.field
            )));
        }
        Ok(())
    }
}
