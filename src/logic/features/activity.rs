//! Activity State Features

use super::vector::{FeatureExtractor, FeatureVector};

#[derive(Debug, Clone, Default)]
pub struct ActivityFeatures {
    pub active: u32,
    pub total: u32,
}

impl ActivityFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self, is_active: bool) {
        self.total += 1;
        if is_active {
            self.active += 1;
        }
    }

    pub fn inactive(&self) -> u32 {
        self.total - self.active
    }

    /// active / inactive, 0 when nothing is inactive
    pub fn ratio(&self) -> f64 {
        let inactive = self.inactive();
        if inactive > 0 {
            self.active as f64 / inactive as f64
        } else {
            0.0
        }
    }
}

impl FeatureExtractor for ActivityFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.values[11] = self.active as f64;
        vector.values[12] = self.inactive() as f64;
        vector.values[13] = self.ratio();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        let mut activity = ActivityFeatures::new();
        activity.add_session(true);
        activity.add_session(true);
        activity.add_session(true);
        activity.add_session(false);
        activity.add_session(false);

        assert_eq!(activity.inactive(), 2);
        assert_eq!(activity.ratio(), 1.5);
    }

    #[test]
    fn test_all_active() {
        let mut activity = ActivityFeatures::new();
        activity.add_session(true);

        let mut vector = FeatureVector::new();
        activity.extract(&mut vector);
        assert_eq!(&vector.values[11..14], &[1.0, 0.0, 0.0]);
    }
}
