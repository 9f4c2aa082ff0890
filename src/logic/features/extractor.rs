//! Session Feature Extractor
//!
//! Maps one session container to the 23-value [`FeatureVector`]. Total over
//! every input: malformed fields fall back to neutral defaults, a container
//! with no session records yields the zero vector.

use serde_json::Value;

use super::activity::ActivityFeatures;
use super::chains::ChainFeatures;
use super::counters::CounterFeatures;
use super::device::DeviceFeatures;
use super::pending::PendingPreKeyFeatures;
use super::session::{collect_records, ReservedKeyPolicy, SessionShapePolicy};
use super::timing::TimingFeatures;
use super::vector::{FeatureExtractor, FeatureVector};

/// Extract features using the default container shape policy
pub fn extract_features(container: &Value) -> FeatureVector {
    SessionFeatureExtractor::default().extract(container)
}

pub struct SessionFeatureExtractor {
    policy: Box<dyn SessionShapePolicy + Send + Sync>,
}

impl SessionFeatureExtractor {
    pub fn new(policy: Box<dyn SessionShapePolicy + Send + Sync>) -> Self {
        Self { policy }
    }

    pub fn extract(&self, container: &Value) -> FeatureVector {
        let records = collect_records(container, self.policy.as_ref());
        if records.is_empty() {
            log::debug!("No session records, returning zero vector");
            return FeatureVector::new();
        }

        let mut timing = TimingFeatures::new();
        let mut chains = ChainFeatures::new();
        let mut device = DeviceFeatures::new();
        let mut activity = ActivityFeatures::new();
        let mut pending = PendingPreKeyFeatures::new();
        let mut counters = CounterFeatures::new();

        for record in &records {
            timing.add_session(record.timestamp());
            chains.add_session(record.chain_count());
            device.add_session(record.base_key_type());
            activity.add_session(record.is_active());
            pending.add(record.pending_pre_key());
            counters.add_session(
                record.ratchet_counter(),
                record.signed_key_id(),
                record.pre_key_id(),
            );
        }

        let groups: [&dyn FeatureExtractor; 6] =
            [&timing, &chains, &device, &activity, &pending, &counters];

        let mut vector = FeatureVector::new();
        for group in groups {
            group.extract(&mut vector);
        }
        vector.sanitize();

        log::debug!(
            "Extracted features from {} sessions ({} timestamped)",
            records.len(),
            timing.timestamps.len()
        );
        vector
    }
}

impl Default for SessionFeatureExtractor {
    fn default() -> Self {
        Self::new(Box::new(ReservedKeyPolicy::default()))
    }
}
