//! Scaler - Feature normalization fit during training
//!
//! The artifact is JSON tagged by `kind`:
//!
//! ```json
//! { "kind": "standard", "mean": [..23], "scale": [..23] }
//! { "kind": "min_max", "min_vals": [..23], "max_vals": [..23] }
//! ```
//!
//! Either form may carry `feature_version` / `layout_hash`; when present they
//! must match the current layout.

use std::path::Path;

use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, DetectorResult};
use crate::logic::features::layout::{validate_layout, FEATURE_COUNT};

/// Deterministic, length-preserving normalization
pub trait Scaler: Send + Sync {
    fn transform(&self, features: &[f64]) -> DetectorResult<Vec<f64>>;
}

// ============================================================================
// STANDARD SCALER
// ============================================================================

/// `(x - mean) / scale`, as sklearn's StandardScaler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> DetectorResult<Vec<f64>> {
        check_len("scaler input", features.len())?;
        check_len("scaler mean", self.mean.len())?;
        check_len("scaler scale", self.scale.len())?;
        let x = ArrayView1::from(features);
        let mean = ArrayView1::from(&self.mean[..]);
        // Constant features were fit with scale 0
        let scale = Array1::from_iter(self.scale.iter().map(|s| if *s == 0.0 { 1.0 } else { *s }));

        let scaled = Zip::from(&x)
            .and(&mean)
            .and(&scale)
            .map_collect(|x, m, s| (x - m) / s);
        Ok(scaled.to_vec())
    }
}

// ============================================================================
// MIN-MAX SCALER
// ============================================================================

/// Clamped `(x - min) / (max - min)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min_vals: Vec<f64>,
    pub max_vals: Vec<f64>,
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self {
            min_vals: vec![0.0; FEATURE_COUNT],
            max_vals: vec![1.0; FEATURE_COUNT],
        }
    }
}

impl Scaler for MinMaxScaler {
    fn transform(&self, features: &[f64]) -> DetectorResult<Vec<f64>> {
        check_len("scaler input", features.len())?;
        check_len("scaler min_vals", self.min_vals.len())?;
        check_len("scaler max_vals", self.max_vals.len())?;
        let normalized = features
            .iter()
            .zip(self.min_vals.iter().zip(self.max_vals.iter()))
            .map(|(x, (min_val, max_val))| {
                let range = (max_val - min_val).max(1e-8);
                ((x - min_val) / range).clamp(0.0, 1.0)
            })
            .collect();
        Ok(normalized)
    }
}

// ============================================================================
// ARTIFACT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerParams {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    #[serde(flatten)]
    pub params: ScalerParams,
    #[serde(default)]
    pub feature_version: Option<u8>,
    #[serde(default)]
    pub layout_hash: Option<u32>,
}

impl ScalerArtifact {
    /// Validate dimensions and declared layout, then hand out the scaler
    pub fn into_scaler(self) -> DetectorResult<Box<dyn Scaler>> {
        if let (Some(version), Some(hash)) = (self.feature_version, self.layout_hash) {
            validate_layout(version, hash)?;
        }

        match self.params {
            ScalerParams::Standard(s) => {
                check_len("scaler mean", s.mean.len())?;
                check_len("scaler scale", s.scale.len())?;
                Ok(Box::new(s))
            }
            ScalerParams::MinMax(s) => {
                check_len("scaler min_vals", s.min_vals.len())?;
                check_len("scaler max_vals", s.max_vals.len())?;
                Ok(Box::new(s))
            }
        }
    }
}

/// Load scaler artifact from disk
pub fn load_scaler(path: &Path) -> DetectorResult<Box<dyn Scaler>> {
    log::info!("Loading scaler from: {}", path.display());
    let data = std::fs::read(path)?;
    let artifact: ScalerArtifact = serde_json::from_slice(&data)?;
    artifact.into_scaler()
}

fn check_len(artifact: &'static str, actual: usize) -> DetectorResult<()> {
    if actual != FEATURE_COUNT {
        return Err(DetectorError::DimensionMismatch {
            artifact,
            expected: FEATURE_COUNT,
            actual,
        });
    }
    Ok(())
}
