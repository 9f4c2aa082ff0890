//! Pending PreKey Features
//!
//! `pendingPreKey` shows up in three shapes depending on the client that
//! persisted the session: a plain count, a descriptive object, or a list.
//! Each shape is normalized to one count before aggregation.

use serde_json::{Map, Value};

use super::vector::{FeatureExtractor, FeatureVector};

/// The `pendingPreKey` field, by shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingPreKey<'a> {
    Count(f64),
    Record(&'a Map<String, Value>),
    List(&'a [Value]),
    Absent,
}

impl<'a> PendingPreKey<'a> {
    pub fn from_field(field: Option<&'a Value>) -> Self {
        match field {
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Absent, Self::Count),
            Some(Value::Object(map)) => Self::Record(map),
            Some(Value::Array(items)) => Self::List(items),
            // null, bool, string
            _ => Self::Absent,
        }
    }

    /// Count of pending keys this shape stands for
    ///
    /// A record object means exactly one pending key whatever it contains.
    pub fn count(&self) -> f64 {
        match self {
            Self::Count(n) => *n,
            Self::Record(_) => 1.0,
            Self::List(items) => items.len() as f64,
            Self::Absent => 0.0,
        }
    }
}

/// Aggregated pending-prekey statistics (indices 14-16)
#[derive(Debug, Clone, Default)]
pub struct PendingPreKeyFeatures {
    pub total: f64,
    pub with_pending: u32,
    pub sessions: u32,
}

impl PendingPreKeyFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pending: PendingPreKey<'_>) {
        let count = pending.count();
        self.total += count;
        self.sessions += 1;
        if count > 0.0 {
            self.with_pending += 1;
        }
    }

    pub fn mean(&self) -> f64 {
        if self.sessions > 0 {
            self.total / self.sessions as f64
        } else {
            0.0
        }
    }

    pub fn fraction(&self) -> f64 {
        if self.sessions > 0 {
            self.with_pending as f64 / self.sessions as f64
        } else {
            0.0
        }
    }
}

impl FeatureExtractor for PendingPreKeyFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.values[14] = self.total;
        vector.values[15] = self.mean();
        vector.values[16] = self.fraction();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_dispatch() {
        let number = json!(3);
        let real = json!(1.5);
        let record = json!({ "signedKeyId": 1 });
        let empty_record = json!({});
        let list = json!([1, 2, 3]);

        assert_eq!(PendingPreKey::from_field(Some(&number)).count(), 3.0);
        assert_eq!(PendingPreKey::from_field(Some(&real)).count(), 1.5);
        assert_eq!(PendingPreKey::from_field(Some(&record)).count(), 1.0);
        assert_eq!(PendingPreKey::from_field(Some(&empty_record)).count(), 1.0);
        assert_eq!(PendingPreKey::from_field(Some(&list)).count(), 3.0);
        assert_eq!(PendingPreKey::from_field(None).count(), 0.0);
    }

    #[test]
    fn test_other_types_are_absent() {
        for value in [json!(null), json!(true), json!("2")] {
            assert_eq!(PendingPreKey::from_field(Some(&value)), PendingPreKey::Absent);
        }
    }

    #[test]
    fn test_aggregation() {
        let mut features = PendingPreKeyFeatures::new();
        features.add(PendingPreKey::Count(3.0));
        features.add(PendingPreKey::Absent);
        features.add(PendingPreKey::Count(2.0));

        assert_eq!(features.total, 5.0);
        assert!((features.mean() - 5.0 / 3.0).abs() < 1e-9);
        assert!((features.fraction() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty() {
        let features = PendingPreKeyFeatures::new();
        assert_eq!(features.mean(), 0.0);
        assert_eq!(features.fraction(), 0.0);
    }
}
