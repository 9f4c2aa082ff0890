//! Model Artifacts - Discovery & Backend Selection
//!
//! Which classifier backends exist is fixed at build time (`onnx` feature).
//! Per call the locator picks the first artifact directory that exists, then
//! the first compiled backend whose model file is present in it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::classifier::{Classifier, LinearClassifier};
use super::scaler::{load_scaler, Scaler};
use crate::config::DetectorConfig;
use crate::constants::{LINEAR_MODEL_FILE, MODEL_DIR_NAME, ONNX_MODEL_FILE, SCALER_FILE};
use crate::error::{DetectorError, DetectorResult};

// ============================================================================
// BACKENDS
// ============================================================================

#[cfg(feature = "onnx")]
const COMPILED_BACKENDS: &[Backend] = &[Backend::Onnx, Backend::Linear];
#[cfg(not(feature = "onnx"))]
const COMPILED_BACKENDS: &[Backend] = &[Backend::Linear];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Onnx,
    Linear,
}

impl Backend {
    /// Backends compiled into this build, in preference order
    pub fn available() -> &'static [Backend] {
        COMPILED_BACKENDS
    }

    pub fn model_file(&self) -> &'static str {
        match self {
            Backend::Onnx => ONNX_MODEL_FILE,
            Backend::Linear => LINEAR_MODEL_FILE,
        }
    }

    pub fn load(&self, path: &Path) -> DetectorResult<Arc<dyn Classifier>> {
        match self {
            #[cfg(feature = "onnx")]
            Backend::Onnx => Ok(Arc::new(super::classifier::OnnxClassifier::load(path)?)),
            #[cfg(not(feature = "onnx"))]
            Backend::Onnx => Err(DetectorError::Inference(format!(
                "ONNX backend not compiled in, cannot load {}",
                path.display()
            ))),
            Backend::Linear => Ok(Arc::new(LinearClassifier::load(path)?)),
        }
    }
}

// ============================================================================
// PROVIDERS
// ============================================================================

/// Scaler + classifier pair ready for one inference
#[derive(Clone)]
pub struct LoadedModel {
    pub scaler: Arc<dyn Scaler>,
    pub classifier: Arc<dyn Classifier>,
}

pub trait ArtifactProvider: Send + Sync {
    fn load(&self) -> DetectorResult<LoadedModel>;
}

/// Collaborators supplied in memory
pub struct StaticArtifacts(pub LoadedModel);

impl StaticArtifacts {
    pub fn new(scaler: Arc<dyn Scaler>, classifier: Arc<dyn Classifier>) -> Self {
        Self(LoadedModel { scaler, classifier })
    }
}

impl ArtifactProvider for StaticArtifacts {
    fn load(&self) -> DetectorResult<LoadedModel> {
        Ok(self.0.clone())
    }
}

// ============================================================================
// DISK LOCATOR
// ============================================================================

/// Resolved artifact files
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub scaler: PathBuf,
    pub model: PathBuf,
    pub backend: Backend,
}

#[derive(Debug, Clone)]
pub struct ModelLocator {
    dirs: Vec<PathBuf>,
    backends: Vec<Backend>,
}

impl ModelLocator {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            backends: Backend::available().to_vec(),
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.model_dirs())
    }

    /// Restrict to a subset of compiled backends
    pub fn with_backends(mut self, backends: Vec<Backend>) -> Self {
        self.backends = backends;
        self
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn locate(&self) -> DetectorResult<ArtifactPaths> {
        let dir = self
            .dirs
            .iter()
            .find(|d| d.is_dir())
            .or_else(|| self.dirs.last())
            .cloned()
            .unwrap_or_else(|| PathBuf::from(MODEL_DIR_NAME));

        let scaler = dir.join(SCALER_FILE);
        let found = self
            .backends
            .iter()
            .map(|b| (*b, dir.join(b.model_file())))
            .find(|(_, path)| path.is_file());

        let scaler_exists = scaler.is_file();
        match found {
            Some((backend, model)) if scaler_exists => {
                log::info!("Using {:?} backend from {}", backend, dir.display());
                Ok(ArtifactPaths { dir, scaler, model, backend })
            }
            found => {
                let model_exists = found.is_some();
                let model = found.map(|(_, path)| path).unwrap_or_else(|| {
                    let preferred = self.backends.first().copied().unwrap_or(Backend::Linear);
                    dir.join(preferred.model_file())
                });

                Err(DetectorError::ArtifactMissing {
                    checked_dirs: self.dirs.clone(),
                    expected_files: vec![model, scaler],
                    model_exists,
                    scaler_exists,
                })
            }
        }
    }
}

impl ArtifactProvider for ModelLocator {
    fn load(&self) -> DetectorResult<LoadedModel> {
        let paths = self.locate()?;
        let scaler: Arc<dyn Scaler> = Arc::from(load_scaler(&paths.scaler)?);
        let classifier = paths.backend.load(&paths.model)?;
        Ok(LoadedModel { scaler, classifier })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FEATURE_COUNT;
    use serde_json::json;

    fn write_scaler(dir: &Path) {
        let scaler = json!({
            "kind": "standard",
            "mean": vec![0.0; FEATURE_COUNT],
            "scale": vec![1.0; FEATURE_COUNT],
        });
        std::fs::write(dir.join(SCALER_FILE), scaler.to_string()).unwrap();
    }

    fn write_linear(dir: &Path) {
        let model = json!({ "weights": vec![0.0; FEATURE_COUNT], "bias": 0.0 });
        std::fs::write(dir.join(LINEAR_MODEL_FILE), model.to_string()).unwrap();
    }

    #[test]
    fn test_first_existing_dir_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_scaler(second.path());
        write_linear(second.path());

        let missing = first.path().join("nope");
        let locator = ModelLocator::new(vec![missing, second.path().to_path_buf()]);
        let paths = locator.locate().unwrap();

        assert_eq!(paths.dir, second.path());
        assert_eq!(paths.backend, Backend::Linear);
        assert_eq!(paths.model, second.path().join(LINEAR_MODEL_FILE));
    }

    #[test]
    fn test_missing_model_reports_paths() {
        let dir = tempfile::tempdir().unwrap();
        write_scaler(dir.path());

        let locator = ModelLocator::new(vec![dir.path().to_path_buf()])
            .with_backends(vec![Backend::Linear]);

        match locator.locate() {
            Err(DetectorError::ArtifactMissing { checked_dirs, expected_files, model_exists, scaler_exists }) => {
                assert_eq!(checked_dirs, vec![dir.path().to_path_buf()]);
                assert_eq!(
                    expected_files,
                    vec![dir.path().join(LINEAR_MODEL_FILE), dir.path().join(SCALER_FILE)]
                );
                assert!(!model_exists);
                assert!(scaler_exists);
            }
            other => panic!("Expected ArtifactMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_scaler() {
        let dir = tempfile::tempdir().unwrap();
        write_linear(dir.path());

        let locator = ModelLocator::new(vec![dir.path().to_path_buf()]);
        assert!(matches!(
            locator.locate(),
            Err(DetectorError::ArtifactMissing { model_exists: true, scaler_exists: false, .. })
        ));
    }

    #[test]
    fn test_no_dirs_exist() {
        let root = tempfile::tempdir().unwrap();
        let dirs = vec![root.path().join("a"), root.path().join("b")];
        let locator = ModelLocator::new(dirs.clone());

        match locator.load() {
            Err(DetectorError::ArtifactMissing { checked_dirs, expected_files, .. }) => {
                assert_eq!(checked_dirs, dirs);
                assert!(expected_files.iter().all(|f| f.starts_with(root.path().join("b"))));
            }
            Err(other) => panic!("Expected ArtifactMissing, got {:?}", other),
            Ok(_) => panic!("Expected ArtifactMissing"),
        }
    }

    #[test]
    fn test_load_linear_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_scaler(dir.path());
        write_linear(dir.path());

        let model = ModelLocator::new(vec![dir.path().to_path_buf()]).load().unwrap();
        let scaled = model.scaler.transform(&[1.0; FEATURE_COUNT]).unwrap();
        assert_eq!(model.classifier.predict(&scaled).unwrap(), 0.5);
        assert_eq!(model.classifier.method(), LinearClassifier::METHOD);
    }
}
