//! Central Configuration Constants
//!
//! Single source of truth for artifact names, container keys and
//! environment variable names.

/// App name
pub const APP_NAME: &str = "os-detector";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Model artifacts
// ============================================

/// Directory name searched for model artifacts
pub const MODEL_DIR_NAME: &str = "models";

/// Scaler artifact (JSON, tagged by `kind`)
pub const SCALER_FILE: &str = "os_detector_scaler.json";

/// ONNX classifier artifact
pub const ONNX_MODEL_FILE: &str = "os_detector_model.onnx";

/// Linear classifier artifact (JSON weights + bias)
pub const LINEAR_MODEL_FILE: &str = "os_detector_model.json";

/// Env var overriding artifact discovery
pub const MODEL_DIR_ENV: &str = "OS_DETECTOR_MODEL_DIR";

// ============================================
// Session container
// ============================================

/// Reserved keys holding the session collection, checked in order.
/// The flag marks keys that may also hold a sequence of records.
pub const RESERVED_SESSION_KEYS: &[(&str, bool)] = &[("_sessions", false), ("sessions", true)];

/// Top-level keys that never hold sessions in a flat container
pub const METADATA_KEYS: &[&str] = &["creds", "chats", "contacts", "messages"];

// ============================================
// Decision
// ============================================

/// Scores above this are the positive class (iOS)
pub const DECISION_BOUNDARY: f64 = 0.5;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get the model directory override from the environment, if any
pub fn get_model_dir_override() -> Option<std::path::PathBuf> {
    std::env::var(MODEL_DIR_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(std::path::PathBuf::from)
}
