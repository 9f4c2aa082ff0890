//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Scaler and classifier artifacts are trained against one exact ordering.
//! A layout change without retraining silently feeds the model garbage.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::DetectorError;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
/// This is the SINGLE SOURCE OF TRUTH for feature layout
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Timing (0-3) ===
    "interval_mean",             // 0: Mean gap between sorted session timestamps
    "interval_std",              // 1: Population stddev of those gaps
    "interval_min",              // 2: Smallest gap
    "interval_max",              // 3: Largest gap

    // === Chains / renegotiation (4-7) ===
    "avg_chains",                // 4: Mean chains per session
    "max_chains",                // 5: Max chains in any session
    "multi_chain_count",         // 6: Sessions with 2+ chains
    "has_multi_chain",           // 7: 1.0 if any multi-chain session

    // === Device type (8-10) ===
    "base_key_type_distinct",    // 8: Distinct baseKeyType tags
    "base_key_type_1",           // 9: Sessions tagged baseKeyType 1
    "base_key_type_2",           // 10: Sessions tagged baseKeyType 2

    // === Activity (11-13) ===
    "active_sessions",           // 11: Sessions with indexInfo.closed == -1
    "inactive_sessions",         // 12: Remaining sessions
    "active_ratio",              // 13: active / inactive (0 if no inactive)

    // === Pending prekeys (14-16) ===
    "pending_prekey_total",      // 14: Sum of normalized pendingPreKey counts
    "pending_prekey_mean",       // 15: Mean per session
    "pending_prekey_fraction",   // 16: Fraction of sessions with count > 0

    // === Counters / key ids (17-19) ===
    "ratchet_counter_mean",      // 17: Mean non-zero currentRatchet.counter
    "signed_key_id_mean",        // 18: Mean non-zero indexInfo.signedKeyId
    "pre_key_id_mean",           // 19: Mean non-zero indexInfo.preKeyId

    // === Volume / velocity (20-22) ===
    "session_count",             // 20: Valid session records
    "time_span",                 // 21: max(ts) - min(ts)
    "sessions_per_hour",         // 22: session_count / max(span hours, 1)
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 23;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Validate that an artifact was trained against the current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), DetectorError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(DetectorError::LayoutMismatch {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}
