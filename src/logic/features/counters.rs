//! Counter / Key Id Features
//!
//! Means over sessions where the value is present and non-zero.

use super::stats;
use super::vector::{FeatureExtractor, FeatureVector};

#[derive(Debug, Clone, Default)]
pub struct CounterFeatures {
    pub ratchet_counters: Vec<f64>,
    pub signed_key_ids: Vec<f64>,
    pub pre_key_ids: Vec<f64>,
}

impl CounterFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(
        &mut self,
        ratchet_counter: Option<f64>,
        signed_key_id: Option<f64>,
        pre_key_id: Option<f64>,
    ) {
        self.ratchet_counters.extend(ratchet_counter);
        self.signed_key_ids.extend(signed_key_id);
        self.pre_key_ids.extend(pre_key_id);
    }
}

impl FeatureExtractor for CounterFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.values[17] = stats::mean(&self.ratchet_counters);
        vector.values[18] = stats::mean(&self.signed_key_ids);
        vector.values[19] = stats::mean(&self.pre_key_ids);
    }
}
