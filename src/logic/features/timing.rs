//! Timing & Volume Features
//!
//! Inter-session intervals (0-3) plus session count, span and velocity (20-22).

use super::stats;
use super::vector::{FeatureExtractor, FeatureVector};

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Default)]
pub struct TimingFeatures {
    pub timestamps: Vec<f64>,
    pub session_count: u32,
}

impl TimingFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a session, recording its timestamp when it has one
    pub fn add_session(&mut self, timestamp: Option<f64>) {
        self.session_count += 1;
        if let Some(ts) = timestamp {
            self.timestamps.push(ts);
        }
    }

    /// Gaps between consecutive sorted timestamps (needs 2+)
    pub fn intervals(&self) -> Vec<f64> {
        let mut sorted = self.timestamps.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted.windows(2).map(|w| w[1] - w[0]).collect()
    }

    pub fn time_span(&self) -> f64 {
        if self.timestamps.len() < 2 {
            return 0.0;
        }
        stats::max(&self.timestamps) - stats::min(&self.timestamps)
    }

    /// Sessions per hour, span floored at one hour
    pub fn sessions_per_hour(&self) -> f64 {
        let span = self.time_span();
        if span <= 0.0 {
            return 0.0;
        }
        let hours = (span / SECONDS_PER_HOUR).max(1.0);
        self.session_count as f64 / hours
    }
}

impl FeatureExtractor for TimingFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        let intervals = self.intervals();
        vector.values[0] = stats::mean(&intervals);
        vector.values[1] = stats::pstdev(&intervals);
        vector.values[2] = stats::min(&intervals);
        vector.values[3] = stats::max(&intervals);

        vector.values[20] = self.session_count as f64;
        vector.values[21] = self.time_span();
        vector.values[22] = self.sessions_per_hour();
    }
}
