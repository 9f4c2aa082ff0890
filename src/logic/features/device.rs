//! Device Type Features
//!
//! `baseKeyType` tags how the session's base key was established.

use std::collections::BTreeMap;

use super::vector::{FeatureExtractor, FeatureVector};

#[derive(Debug, Clone, Default)]
pub struct DeviceFeatures {
    pub base_key_types: BTreeMap<i64, u32>,
}

impl DeviceFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self, base_key_type: Option<i64>) {
        if let Some(tag) = base_key_type {
            *self.base_key_types.entry(tag).or_insert(0) += 1;
        }
    }

    pub fn count_of(&self, tag: i64) -> u32 {
        self.base_key_types.get(&tag).copied().unwrap_or(0)
    }
}

impl FeatureExtractor for DeviceFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.values[8] = self.base_key_types.len() as f64;
        vector.values[9] = self.count_of(1) as f64;
        vector.values[10] = self.count_of(2) as f64;
    }
}
