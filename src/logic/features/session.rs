//! Session Container - Shape detection & record field access
//!
//! A container is either `{ "_sessions": { id: record, .. }, ..metadata }` or a
//! flat `{ id: record, .., "creds": .. }` map. Which shape applies is decided
//! by a [`SessionShapePolicy`] so callers can tighten the flat-map heuristic.
//!
//! Every accessor on [`SessionRecord`] is total: a missing or oddly typed field
//! reads as "absent" and the feature groups apply their neutral default.

use serde_json::{Map, Value};

use super::pending::PendingPreKey;
use crate::constants::{METADATA_KEYS, RESERVED_SESSION_KEYS};

// ============================================================================
// SHAPE POLICY
// ============================================================================

/// Decides which values of a container are candidate session records
pub trait SessionShapePolicy {
    fn candidates<'a>(&self, container: &'a Value) -> Vec<&'a Value>;
}

/// A key that may hold the session collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedKey {
    pub name: String,
    /// Mappings are always accepted; sequences only when set
    pub accepts_sequence: bool,
}

impl ReservedKey {
    pub fn mapping(name: impl Into<String>) -> Self {
        Self { name: name.into(), accepts_sequence: false }
    }

    pub fn mapping_or_sequence(name: impl Into<String>) -> Self {
        Self { name: name.into(), accepts_sequence: true }
    }
}

/// Reserved-key collection first, flat map minus metadata keys otherwise
#[derive(Debug, Clone)]
pub struct ReservedKeyPolicy {
    pub reserved_keys: Vec<ReservedKey>,
    pub metadata_keys: Vec<String>,
    /// When false, a container without a reserved key holds no sessions
    pub flat_fallback: bool,
}

impl ReservedKeyPolicy {
    /// Only accept containers that carry a reserved key
    pub fn strict() -> Self {
        Self {
            flat_fallback: false,
            ..Self::default()
        }
    }
}

impl Default for ReservedKeyPolicy {
    fn default() -> Self {
        Self {
            reserved_keys: RESERVED_SESSION_KEYS
                .iter()
                .map(|&(name, accepts_sequence)| ReservedKey {
                    name: name.to_string(),
                    accepts_sequence,
                })
                .collect(),
            metadata_keys: METADATA_KEYS.iter().map(|s| s.to_string()).collect(),
            flat_fallback: true,
        }
    }
}

impl SessionShapePolicy for ReservedKeyPolicy {
    fn candidates<'a>(&self, container: &'a Value) -> Vec<&'a Value> {
        let Some(map) = container.as_object() else {
            log::debug!("Session container is not a mapping, no sessions");
            return Vec::new();
        };

        for key in &self.reserved_keys {
            match map.get(&key.name) {
                Some(Value::Object(sessions)) => {
                    log::debug!("Sessions read from reserved key '{}'", key.name);
                    return sessions.values().collect();
                }
                Some(Value::Array(sessions)) if key.accepts_sequence => {
                    log::debug!("Sessions read from reserved key '{}' (sequence)", key.name);
                    return sessions.iter().collect();
                }
                _ => {}
            }
        }

        if !self.flat_fallback {
            return Vec::new();
        }

        log::debug!("No reserved key, treating container as flat session map");
        map.iter()
            .filter(|(k, _)| !self.metadata_keys.iter().any(|m| m == *k))
            .map(|(_, v)| v)
            .collect()
    }
}

/// Resolve the container into session records, dropping non-mapping noise
pub fn collect_records<'a>(
    container: &'a Value,
    policy: &dyn SessionShapePolicy,
) -> Vec<SessionRecord<'a>> {
    policy
        .candidates(container)
        .into_iter()
        .filter_map(SessionRecord::from_value)
        .collect()
}

// ============================================================================
// SESSION RECORD
// ============================================================================

/// Borrowed view over one persisted session
#[derive(Debug, Clone, Copy)]
pub struct SessionRecord<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> SessionRecord<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(|fields| Self { fields })
    }

    /// Non-zero `timestamp`, falling back to `ts`
    pub fn timestamp(&self) -> Option<f64> {
        non_zero(number(self.fields.get("timestamp")))
            .or_else(|| non_zero(number(self.fields.get("ts"))))
    }

    /// Chain count: mapping/sequence length, 1 when the field is absent
    pub fn chain_count(&self) -> usize {
        let chains = self
            .fields
            .get("chains")
            .filter(|v| !v.is_null())
            .or_else(|| self.fields.get("_chains").filter(|v| !v.is_null()));

        match chains {
            Some(Value::Object(map)) => map.len(),
            Some(Value::Array(items)) => items.len(),
            _ => 1,
        }
    }

    /// Non-zero baseKeyType tag from indexInfo, top-level as fallback
    pub fn base_key_type(&self) -> Option<i64> {
        integer(self.index_info("baseKeyType"))
            .filter(|t| *t != 0)
            .or_else(|| integer(self.fields.get("baseKeyType")).filter(|t| *t != 0))
    }

    /// Active means `indexInfo.closed == -1`; absent counts as inactive
    pub fn is_active(&self) -> bool {
        integer(self.index_info("closed")) == Some(-1)
    }

    pub fn pending_pre_key(&self) -> PendingPreKey<'a> {
        PendingPreKey::from_field(self.fields.get("pendingPreKey"))
    }

    pub fn ratchet_counter(&self) -> Option<f64> {
        let counter = self
            .fields
            .get("currentRatchet")
            .and_then(Value::as_object)
            .and_then(|r| r.get("counter"));
        non_zero(number(counter))
    }

    pub fn signed_key_id(&self) -> Option<f64> {
        non_zero(number(self.index_info("signedKeyId")))
    }

    pub fn pre_key_id(&self) -> Option<f64> {
        non_zero(number(self.index_info("preKeyId")))
    }

    fn index_info(&self, key: &str) -> Option<&'a Value> {
        self.fields
            .get("indexInfo")
            .and_then(Value::as_object)
            .and_then(|info| info.get(key))
    }
}

// ============================================================================
// FIELD HELPERS
// ============================================================================

/// JSON numbers only; booleans and numeric strings are malformed
fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn integer(value: Option<&Value>) -> Option<i64> {
    let value = value?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}
