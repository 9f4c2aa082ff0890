//! Error handling
//!
//! Pipeline-level failures. Feature-level malformation never reaches this
//! type: the extractor substitutes defaults instead.

use std::path::PathBuf;

use thiserror::Error;

pub type DetectorResult<T> = Result<T, DetectorError>;

#[derive(Debug, Error)]
pub enum DetectorError {
    // Source errors
    #[error("Session file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Artifact errors
    #[error("Model files not found. Checked: {}", join_paths(.checked_dirs))]
    ArtifactMissing {
        checked_dirs: Vec<PathBuf>,
        expected_files: Vec<PathBuf>,
        model_exists: bool,
        scaler_exists: bool,
    },

    #[error(
        "Feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
         got v{actual_version} (hash: {actual_hash:08x})"
    )]
    LayoutMismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },

    #[error("{artifact}: expected {expected} values, got {actual}")]
    DimensionMismatch {
        artifact: &'static str,
        expected: usize,
        actual: usize,
    },

    // Inference errors
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl DetectorError {
    /// Whether this failure is expected operational state (missing inputs)
    /// rather than an internal fault worth a diagnostic trace
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            DetectorError::SourceNotFound(_) | DetectorError::ArtifactMissing { .. }
        )
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
