//! Chain / Renegotiation Features
//!
//! Multiple chains in one session mean the session was renegotiated.

use super::stats;
use super::vector::{FeatureExtractor, FeatureVector};

/// Chain count at which a session counts as renegotiated
pub const MULTI_CHAIN_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct ChainFeatures {
    pub chain_counts: Vec<f64>,
    pub multi_chain_count: u32,
}

impl ChainFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self, chain_count: usize) {
        self.chain_counts.push(chain_count as f64);
        if chain_count >= MULTI_CHAIN_THRESHOLD {
            self.multi_chain_count += 1;
        }
    }

    pub fn avg_chains(&self) -> f64 {
        stats::mean(&self.chain_counts)
    }

    pub fn max_chains(&self) -> f64 {
        stats::max(&self.chain_counts)
    }
}

impl FeatureExtractor for ChainFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.values[4] = self.avg_chains();
        vector.values[5] = self.max_chains();
        vector.values[6] = self.multi_chain_count as f64;
        vector.values[7] = if self.multi_chain_count > 0 { 1.0 } else { 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_features() {
        let mut chains = ChainFeatures::new();
        chains.add_session(1);
        chains.add_session(3);
        chains.add_session(0);
        chains.add_session(2);

        let mut vector = FeatureVector::new();
        chains.extract(&mut vector);
        assert_eq!(&vector.values[4..8], &[1.5, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_single_chain_sessions() {
        let mut chains = ChainFeatures::new();
        chains.add_session(1);
        chains.add_session(1);

        let mut vector = FeatureVector::new();
        chains.extract(&mut vector);
        assert_eq!(&vector.values[4..8], &[1.0, 1.0, 0.0, 0.0]);
    }
}
