//! Features Module - Feature Extraction Engine
//!
//! Turns a persisted session container into the fixed feature vector.
//! Each group owns its slice of the layout and writes it through
//! [`FeatureExtractor`].

pub mod layout;
pub mod vector;
pub mod session;
pub mod pending;
pub mod stats;
pub mod timing;
pub mod chains;
pub mod device;
pub mod activity;
pub mod counters;
pub mod extractor;


// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LayoutInfo};
pub use vector::{FeatureVector, FeatureExtractor};
pub use session::{ReservedKey, ReservedKeyPolicy, SessionRecord, SessionShapePolicy};
pub use pending::PendingPreKey;
pub use extractor::{extract_features, SessionFeatureExtractor};
