//! Decision Threshold
//!
//! Maps a raw classifier score to a label and a calibrated confidence.

use serde::{Deserialize, Serialize};

use crate::constants::DECISION_BOUNDARY;

/// Device OS family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OsType {
    /// Negative class (score <= boundary)
    Android,
    /// Positive class (score > boundary)
    #[serde(rename = "iOS")]
    Ios,
    Unknown,
}

/// Label and confidence for one score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub os_type: OsType,
    pub confidence: f64,
}

impl Decision {
    /// `confidence = clamp(|score - 0.5| * 2, 0, 1)`: 0 on the boundary,
    /// approaching 1 at either extreme
    pub fn from_score(score: f64) -> Self {
        let os_type = if score > DECISION_BOUNDARY {
            OsType::Ios
        } else {
            OsType::Android
        };
        let confidence = ((score - DECISION_BOUNDARY).abs() * 2.0).clamp(0.0, 1.0);

        Self { os_type, confidence }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_has_zero_confidence() {
        let d = Decision::from_score(0.5);
        assert_eq!(d.os_type, OsType::Android);
        assert_eq!(d.confidence, 0.0);
    }

    #[test]
    fn test_extremes() {
        let d = Decision::from_score(1.0);
        assert_eq!(d.os_type, OsType::Ios);
        assert_eq!(d.confidence, 1.0);

        let d = Decision::from_score(0.0);
        assert_eq!(d.os_type, OsType::Android);
        assert_eq!(d.confidence, 1.0);
    }

    #[test]
    fn test_confidence_always_in_range() {
        for score in [-1.0e9, -3.0, -0.1, 0.1, 0.25, 0.5000001, 0.75, 0.99, 1.5, 42.0, 1.0e9] {
            let d = Decision::from_score(score);
            assert!((0.0..=1.0).contains(&d.confidence), "score {}", score);
        }
        assert!((Decision::from_score(0.75).confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(serde_json::to_string(&OsType::Ios).unwrap(), "\"iOS\"");
        assert_eq!(serde_json::to_string(&OsType::Android).unwrap(), "\"Android\"");
        assert_eq!(serde_json::to_string(&OsType::Unknown).unwrap(), "\"Unknown\"");
    }
}
