//! Confidence bucketing for predictions
//!
//! The confidence label is a fixed heuristic over the clamped prediction
//! magnitude, not a statistical interval. Thresholds are part of the
//! published API contract and must not drift.

use serde::{Deserialize, Serialize};

/// Qualitative confidence bucket attached to every prediction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Classify a clamped (non-negative) prediction value:
    /// [0, 10] => High, (10, 20] => Medium, above 20 => Low.
    pub fn classify(value: f64) -> Self {
        if value <= 10.0 {
            Confidence::High
        } else if value <= 20.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(Confidence::classify(0.0), Confidence::High);
        assert_eq!(Confidence::classify(10.0), Confidence::High);
        assert_eq!(Confidence::classify(10.0001), Confidence::Medium);
        assert_eq!(Confidence::classify(20.0), Confidence::Medium);
        assert_eq!(Confidence::classify(20.0001), Confidence::Low);
    }

    #[test]
    fn test_serializes_as_plain_label() {
        let json = serde_json::to_string(&Confidence::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
    }
}
