//! Model Module - Inference Engine
//!
//! Scaler and classifier are pre-trained artifacts behind traits, so the
//! backend can be swapped without touching the pipeline.

pub mod scaler;
pub mod classifier;
pub mod artifacts;
pub mod threshold;
pub mod source;
pub mod result;
pub mod inference;

#[cfg(test)]
mod tests;

// Re-export common types
pub use scaler::{Scaler, StandardScaler, MinMaxScaler};
pub use classifier::{Classifier, LinearClassifier};
#[cfg(feature = "onnx")]
pub use classifier::OnnxClassifier;
pub use artifacts::{ArtifactProvider, Backend, LoadedModel, ModelLocator, StaticArtifacts};
pub use threshold::{Decision, OsType};
pub use source::{FileSource, SessionSource};
pub use result::{DiagnosticFeatures, PredictionResult};
pub use inference::{PredictionService, Score};
