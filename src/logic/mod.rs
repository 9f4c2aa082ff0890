//! Logic Module - Business Logic & Engines
//!
//! - `features/` - Session container → feature vector
//! - `model/` - Scaler, classifier and the prediction pipeline

pub mod features;
pub mod model;
