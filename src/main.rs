//! Device OS Detector - Main Entry Point
//!
//! `os-detector <jid> <session_file>` prints exactly one JSON result on
//! stdout. Logs go to stderr.

use std::path::Path;
use std::process::ExitCode;

use os_detector::constants::{APP_NAME, APP_VERSION};
use os_detector::logic::features::LayoutInfo;
use os_detector::logic::model::Backend;
use os_detector::{DetectorConfig, PredictionResult, PredictionService};

/// Outcome of one invocation, holding the single stdout document
#[derive(Debug, Clone, PartialEq)]
enum Invocation {
    /// A prediction ran (the result itself may still be Unknown)
    Completed(String),
    /// Wrong argument count
    Usage(String),
}

impl Invocation {
    fn output(&self) -> &str {
        match self {
            Invocation::Completed(json) | Invocation::Usage(json) => json,
        }
    }

    fn exit_code(&self) -> u8 {
        match self {
            Invocation::Completed(_) => 0,
            Invocation::Usage(_) => 1,
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);
    log::info!("Inference backends: {:?}", Backend::available());
    let layout = LayoutInfo::current();
    log::debug!("Feature layout v{} ({:08x}), {} features", layout.version, layout.hash, layout.feature_count);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let service = PredictionService::from_config(&DetectorConfig::from_env());

    let invocation = run(&args, &service);
    println!("{}", invocation.output());
    ExitCode::from(invocation.exit_code())
}

fn run(args: &[String], service: &PredictionService) -> Invocation {
    let [jid, session_file] = args else {
        return Invocation::Usage(
            serde_json::json!({ "error": format!("Usage: {} <jid> <session_file>", APP_NAME) })
                .to_string(),
        );
    };

    let result = service.predict_file(jid, Path::new(session_file));
    Invocation::Completed(render(jid, &result))
}

fn render(jid: &str, result: &PredictionResult) -> String {
    match serde_json::to_string(result) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize result: {}", e);
            serde_json::json!({
                "jid": jid,
                "osType": "Unknown",
                "confidence": 0,
                "method": "unknown",
                "error": format!("Failed to serialize result: {}", e),
            })
            .to_string()
        }
    }
}
