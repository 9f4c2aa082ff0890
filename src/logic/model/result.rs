//! Prediction Result - the JSON document handed back to callers
//!
//! Success and failure share one shape; failures carry `osType: "Unknown"`,
//! zero confidence and an `error` description.

use serde::{Deserialize, Serialize};

use super::threshold::{Decision, OsType};
use crate::error::DetectorError;
use crate::logic::features::FeatureVector;

/// Method tag for results that never reached a classifier
pub const METHOD_UNKNOWN: &str = "unknown";

/// Small, human-readable subset of the feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticFeatures {
    pub avg_chains: f64,
    pub max_chains: f64,
    pub multi_chain_count: f64,
    pub session_count: f64,
    pub active_sessions: f64,
    pub pending_prekey_total: f64,
}

impl From<&FeatureVector> for DiagnosticFeatures {
    fn from(vector: &FeatureVector) -> Self {
        let named = |name: &str| vector.get_by_name(name).unwrap_or(0.0);
        Self {
            avg_chains: named("avg_chains"),
            max_chains: named("max_chains"),
            multi_chain_count: named("multi_chain_count"),
            session_count: named("session_count"),
            active_sessions: named("active_sessions"),
            pending_prekey_total: named("pending_prekey_total"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub jid: String,
    #[serde(rename = "osType")]
    pub os_type: OsType,
    pub confidence: f64,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<DiagnosticFeatures>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler_exists: Option<bool>,
}

impl PredictionResult {
    pub fn success(
        jid: &str,
        score: f64,
        method: &str,
        features: DiagnosticFeatures,
    ) -> Self {
        let decision = Decision::from_score(score);
        Self {
            os_type: decision.os_type,
            confidence: decision.confidence,
            method: method.to_string(),
            prediction_score: Some(score),
            features: Some(features),
            error: None,
            ..Self::unknown(jid, String::new())
        }
    }

    /// Unknown result for a pipeline error
    ///
    /// Missing inputs are reported plainly; anything else carries the error
    /// chain as a diagnostic trace.
    pub fn failure(jid: &str, err: DetectorError, features: Option<DiagnosticFeatures>) -> Self {
        let mut result = Self::unknown(jid, err.to_string());
        result.features = features;

        match err {
            DetectorError::ArtifactMissing { expected_files, model_exists, scaler_exists, .. } => {
                result.expected_files = Some(
                    expected_files.iter().map(|p| p.display().to_string()).collect(),
                );
                result.model_exists = Some(model_exists);
                result.scaler_exists = Some(scaler_exists);
            }
            err if !err.is_expected() => {
                result.traceback = Some(format!("{:?}", anyhow::Error::new(err)));
            }
            _ => {}
        }
        result
    }

    /// Unknown result for a panic caught at the service boundary
    pub fn internal(jid: &str, message: String, trace: String) -> Self {
        Self {
            traceback: Some(trace),
            ..Self::unknown(jid, format!("Unexpected error: {}", message))
        }
    }

    fn unknown(jid: &str, error: String) -> Self {
        Self {
            jid: jid.to_string(),
            os_type: OsType::Unknown,
            confidence: 0.0,
            method: METHOD_UNKNOWN.to_string(),
            prediction_score: None,
            features: None,
            error: Some(error),
            traceback: None,
            expected_files: None,
            model_exists: None,
            scaler_exists: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.os_type == OsType::Unknown
    }
}
