//! Classifier - Pre-trained binary scoring function
//!
//! Two backends:
//! - `OnnxClassifier`: ONNX Runtime session (feature `onnx`)
//! - `LinearClassifier`: logistic regression weights, no runtime needed
//!
//! Both map a scaled feature vector to one score in `[0, 1]`; scores above
//! the decision boundary are the positive class.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, DetectorResult};
use crate::logic::features::layout::FEATURE_COUNT;

pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64]) -> DetectorResult<f64>;

    /// Method tag reported with results
    fn method(&self) -> &'static str;
}

// ============================================================================
// LINEAR (LOGISTIC) CLASSIFIER
// ============================================================================

/// `sigmoid(w · x + b)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearClassifier {
    pub const METHOD: &'static str = "linear_ml";

    pub fn load(path: &Path) -> DetectorResult<Self> {
        log::info!("Loading linear model from: {}", path.display());
        let data = std::fs::read(path)?;
        let model: Self = serde_json::from_slice(&data)?;

        if model.weights.len() != FEATURE_COUNT {
            return Err(DetectorError::DimensionMismatch {
                artifact: "linear model weights",
                expected: FEATURE_COUNT,
                actual: model.weights.len(),
            });
        }
        Ok(model)
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &[f64]) -> DetectorResult<f64> {
        if features.len() != self.weights.len() {
            return Err(DetectorError::DimensionMismatch {
                artifact: "linear model input",
                expected: self.weights.len(),
                actual: features.len(),
            });
        }

        let z = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;

        Ok(1.0 / (1.0 + (-z).exp()))
    }

    fn method(&self) -> &'static str {
        Self::METHOD
    }
}

// ============================================================================
// ONNX CLASSIFIER
// ============================================================================

#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

#[cfg(feature = "onnx")]
mod onnx {
    use std::path::Path;

    use ndarray::Array2;
    use ort::session::{builder::GraphOptimizationLevel, Session};
    use ort::value::Value;
    use parking_lot::Mutex;

    use super::Classifier;
    use crate::error::{DetectorError, DetectorResult};
    use crate::logic::features::layout::FEATURE_COUNT;

    /// ONNX model with input `[1, FEATURE_COUNT]` f32 and a single score output
    pub struct OnnxClassifier {
        session: Mutex<Session>,
        output_name: String,
    }

    impl OnnxClassifier {
        pub const METHOD: &'static str = "onnx_ml";

        /// Load ONNX model from file
        pub fn load(model_path: &Path) -> DetectorResult<Self> {
            log::info!("Loading ONNX model from: {}", model_path.display());

            let session = Session::builder()
                .map_err(|e| DetectorError::Inference(format!("Failed to create session builder: {}", e)))?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .map_err(|e| DetectorError::Inference(format!("Failed to set optimization: {}", e)))?
                .commit_from_file(model_path)
                .map_err(|e| DetectorError::Inference(format!("Failed to load model: {}", e)))?;

            let output_name = session
                .outputs
                .first()
                .map(|o| o.name.clone())
                .ok_or_else(|| DetectorError::Inference("No output defined".to_string()))?;

            log::info!("ONNX model loaded successfully");

            Ok(Self {
                session: Mutex::new(session),
                output_name,
            })
        }
    }

    impl Classifier for OnnxClassifier {
        fn predict(&self, features: &[f64]) -> DetectorResult<f64> {
            let input: Vec<f32> = features.iter().map(|v| *v as f32).collect();
            let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input)
                .map_err(|e| DetectorError::Inference(format!("Array error: {}", e)))?;

            let input_tensor = Value::from_array(input_array)
                .map_err(|e| DetectorError::Inference(format!("Tensor error: {}", e)))?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![input_tensor])
                .map_err(|e| DetectorError::Inference(format!("Inference failed: {}", e)))?;

            let output = outputs
                .get(&self.output_name)
                .ok_or_else(|| DetectorError::Inference("No output".to_string()))?;

            let (_, data) = output
                .try_extract_tensor::<f32>()
                .map_err(|e| DetectorError::Inference(format!("Extract error: {}", e)))?;

            data.first()
                .map(|score| *score as f64)
                .ok_or_else(|| DetectorError::Inference("Empty model output".to_string()))
        }

        fn method(&self) -> &'static str {
            Self::METHOD
        }
    }
}
