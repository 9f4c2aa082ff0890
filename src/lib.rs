//! Device OS Detector - Core Library
//!
//! Infers a device's OS family from a messaging client's persisted session
//! state: session container → 23 features → scaler → classifier → label.
//!
//! ```no_run
//! use os_detector::{DetectorConfig, PredictionService};
//!
//! let service = PredictionService::from_config(&DetectorConfig::from_env());
//! let result = service.predict_file("123@s.whatsapp.net", std::path::Path::new("session.json"));
//! println!("{}", serde_json::to_string(&result).unwrap());
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use config::DetectorConfig;
pub use error::{DetectorError, DetectorResult};
pub use logic::features::{extract_features, FeatureVector, SessionFeatureExtractor};
pub use logic::model::{OsType, PredictionResult, PredictionService};
