//! Inference Engine - Session container to OS prediction
//!
//! load container → extract features → scale → classify → decide.
//! Single pass, no retries, no state between calls. `predict` never fails:
//! every error and panic becomes an Unknown [`PredictionResult`].

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Once;

use super::artifacts::{ArtifactProvider, ModelLocator};
use super::result::{DiagnosticFeatures, PredictionResult};
use super::source::{FileSource, SessionSource};
use crate::config::DetectorConfig;
use crate::error::{DetectorError, DetectorResult};
use crate::logic::features::{FeatureVector, SessionFeatureExtractor, FEATURE_COUNT};

/// Raw classifier output plus the backend that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub value: f64,
    pub method: &'static str,
}

pub struct PredictionService {
    extractor: SessionFeatureExtractor,
    artifacts: Box<dyn ArtifactProvider>,
}

impl PredictionService {
    pub fn new(artifacts: Box<dyn ArtifactProvider>) -> Self {
        Self {
            extractor: SessionFeatureExtractor::default(),
            artifacts,
        }
    }

    /// Disk-backed service using the configured discovery order
    pub fn from_config(config: &DetectorConfig) -> Self {
        let locator = ModelLocator::from_config(config);
        log::debug!("Artifact directories: {:?}", locator.dirs());
        Self::new(Box::new(locator))
    }

    pub fn with_extractor(mut self, extractor: SessionFeatureExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn predict_file(&self, jid: &str, session_file: &Path) -> PredictionResult {
        self.predict(jid, &FileSource::new(session_file))
    }

    pub fn predict(&self, jid: &str, source: &dyn SessionSource) -> PredictionResult {
        install_panic_hook();
        LAST_PANIC.with(|slot| slot.borrow_mut().take());
        let outer = CAPTURE_PANICS.with(|flag| flag.replace(true));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(jid, source)));
        CAPTURE_PANICS.with(|flag| flag.set(outer));

        match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let capture = LAST_PANIC.with(|slot| slot.borrow_mut().take());
                log::error!("Prediction for {} panicked: {}", jid, message);
                let trace = panic_trace(&message, capture);
                PredictionResult::internal(jid, message, trace)
            }
        }
    }

    fn run(&self, jid: &str, source: &dyn SessionSource) -> PredictionResult {
        let container = match source.load() {
            Ok(container) => container,
            Err(e) => {
                log::warn!("Session source for {} unavailable: {}", jid, e);
                return PredictionResult::failure(jid, e, None);
            }
        };

        let vector = self.extractor.extract(&container);
        log::debug!("Features for {}: {}", jid, vector.to_log_entry());
        let diagnostics = DiagnosticFeatures::from(&vector);

        match self.score(&vector) {
            Ok(score) => {
                let result = PredictionResult::success(jid, score.value, score.method, diagnostics);
                log::info!(
                    "Predicted {:?} for {} (score {:.4}, confidence {:.4}, {})",
                    result.os_type, jid, score.value, result.confidence, score.method
                );
                result
            }
            Err(e) => {
                log::warn!("Prediction for {} failed: {}", jid, e);
                PredictionResult::failure(jid, e, Some(diagnostics))
            }
        }
    }

    /// Scale and classify one vector
    pub fn score(&self, vector: &FeatureVector) -> DetectorResult<Score> {
        vector.validate()?;
        let model = self.artifacts.load()?;

        let scaled = model.scaler.transform(vector.as_slice())?;
        if scaled.len() != FEATURE_COUNT {
            return Err(DetectorError::DimensionMismatch {
                artifact: "scaler output",
                expected: FEATURE_COUNT,
                actual: scaled.len(),
            });
        }

        let value = model.classifier.predict(&scaled)?;
        if !value.is_finite() {
            return Err(DetectorError::Inference(format!("Non-finite score: {}", value)));
        }

        Ok(Score {
            value,
            method: model.classifier.method(),
        })
    }
}

// ============================================================================
// PANIC CAPTURE
// ============================================================================

/// Where a contained panic happened, recorded before the stack unwinds
struct PanicCapture {
    location: Option<String>,
    backtrace: Backtrace,
}

thread_local! {
    static CAPTURE_PANICS: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<PanicCapture>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Chain a hook that records panics raised inside `predict` on this thread.
/// Panics anywhere else go to the previous hook untouched.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURE_PANICS.with(Cell::get) {
                let capture = PanicCapture {
                    location: info.location().map(|l| l.to_string()),
                    backtrace: Backtrace::force_capture(),
                };
                LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(capture));
            } else {
                previous(info);
            }
        }));
    });
}

fn panic_trace(message: &str, capture: Option<PanicCapture>) -> String {
    match capture {
        Some(PanicCapture { location, backtrace }) => format!(
            "panic: {} at {}\n{}",
            message,
            location.as_deref().unwrap_or("<unknown>"),
            backtrace
        ),
        // Hook replaced by someone else; best effort from the handler
        None => format!("panic: {}\n{}", message, Backtrace::force_capture()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
