//! Configuration module

use std::path::PathBuf;

use crate::constants::{self, MODEL_DIR_NAME};

/// Detector configuration
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Explicit artifact directory (skips discovery when set)
    pub model_dir: Option<PathBuf>,

    /// Directory of the running executable
    pub exe_dir: Option<PathBuf>,

    /// Working directory fallback
    pub cwd: PathBuf,
}

impl DetectorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_dir: constants::get_model_dir_override(),

            exe_dir: std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.to_path_buf())),

            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Candidate artifact directories in discovery order
    ///
    /// Executable-relative locations come first (`<exe>/../models`, then
    /// `<exe>/models`), the working directory's `models/` last.
    pub fn model_dirs(&self) -> Vec<PathBuf> {
        if let Some(dir) = &self.model_dir {
            return vec![dir.clone()];
        }

        let mut dirs = Vec::new();
        if let Some(exe_dir) = &self.exe_dir {
            if let Some(parent) = exe_dir.parent() {
                dirs.push(parent.join(MODEL_DIR_NAME));
            }
            dirs.push(exe_dir.join(MODEL_DIR_NAME));
        }
        dirs.push(self.cwd.join(MODEL_DIR_NAME));
        dirs.dedup();
        dirs
    }
}
