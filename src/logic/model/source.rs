//! Session Sources
//!
//! Where a session container comes from is the caller's business; the
//! service only needs a parsed JSON value.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{DetectorError, DetectorResult};

pub trait SessionSource {
    fn load(&self) -> DetectorResult<Value>;
}

/// Session container persisted as a JSON file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSource for FileSource {
    fn load(&self) -> DetectorResult<Value> {
        if !self.path.exists() {
            return Err(DetectorError::SourceNotFound(self.path.clone()));
        }

        let data = std::fs::read(&self.path)?;
        let container = serde_json::from_slice(&data)?;
        log::debug!("Loaded session container from {}", self.path.display());
        Ok(container)
    }
}

/// Already-parsed container
impl SessionSource for Value {
    fn load(&self) -> DetectorResult<Value> {
        Ok(self.clone())
    }
}
