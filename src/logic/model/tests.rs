//! Integration Tests for the Prediction Service
//!
//! Runs the full pipeline against in-memory collaborators and on-disk
//! artifacts written to temp directories.

#[cfg(test)]
mod integration_tests {
    use std::path::Path;
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::constants::{LINEAR_MODEL_FILE, SCALER_FILE};
    use crate::error::DetectorResult;
    use crate::logic::features::{extract_features, FEATURE_COUNT};
    use crate::logic::model::{
        Backend, Classifier, ModelLocator, OsType, PredictionService, Scaler, StaticArtifacts,
    };

    struct Identity;

    impl Scaler for Identity {
        fn transform(&self, features: &[f64]) -> DetectorResult<Vec<f64>> {
            Ok(features.to_vec())
        }
    }

    struct Truncating;

    impl Scaler for Truncating {
        fn transform(&self, features: &[f64]) -> DetectorResult<Vec<f64>> {
            Ok(features[..5].to_vec())
        }
    }

    struct Exploding;

    impl Scaler for Exploding {
        fn transform(&self, _features: &[f64]) -> DetectorResult<Vec<f64>> {
            panic!("scaler exploded")
        }
    }

    struct Constant(f64);

    impl Classifier for Constant {
        fn predict(&self, _features: &[f64]) -> DetectorResult<f64> {
            Ok(self.0)
        }

        fn method(&self) -> &'static str {
            "constant"
        }
    }

    fn service(scaler: impl Scaler + 'static, score: f64) -> PredictionService {
        PredictionService::new(Box::new(StaticArtifacts::new(
            Arc::new(scaler),
            Arc::new(Constant(score)),
        )))
    }

    fn sessions(count: usize) -> Value {
        let sessions: serde_json::Map<String, Value> = (0..count)
            .map(|i| {
                (
                    format!("peer{}.0", i),
                    json!({
                        "timestamp": 1_700_000_000 + i as i64 * 60,
                        "indexInfo": { "closed": -1, "baseKeyType": 1 },
                        "chains": { "c": {} }
                    }),
                )
            })
            .collect();
        json!({ "_sessions": sessions })
    }

    /// Standard scaler with identity params + logistic weight on session_count
    fn write_linear_artifacts(dir: &Path) {
        let scaler = json!({
            "kind": "standard",
            "mean": vec![0.0; FEATURE_COUNT],
            "scale": vec![1.0; FEATURE_COUNT],
        });
        let mut weights = vec![0.0; FEATURE_COUNT];
        weights[20] = 1.0;
        let model = json!({ "weights": weights, "bias": -2.5 });

        std::fs::write(dir.join(SCALER_FILE), scaler.to_string()).unwrap();
        std::fs::write(dir.join(LINEAR_MODEL_FILE), model.to_string()).unwrap();
    }

    fn disk_service(dir: &Path) -> PredictionService {
        PredictionService::new(Box::new(
            ModelLocator::new(vec![dir.to_path_buf()]).with_backends(vec![Backend::Linear]),
        ))
    }

    #[test]
    fn test_positive_and_negative_labels() {
        let ios = service(Identity, 0.9).predict("a@s.whatsapp.net", &sessions(2));
        assert_eq!(ios.os_type, OsType::Ios);
        assert!((ios.confidence - 0.8).abs() < 1e-9);
        assert_eq!(ios.prediction_score, Some(0.9));
        assert_eq!(ios.method, "constant");

        let android = service(Identity, 0.2).predict("b@s.whatsapp.net", &sessions(2));
        assert_eq!(android.os_type, OsType::Android);
        assert!((android.confidence - 0.6).abs() < 1e-9);
        assert!(android.error.is_none());
    }

    #[test]
    fn test_boundary_score() {
        let result = service(Identity, 0.5).predict("jid", &sessions(1));
        assert_eq!(result.os_type, OsType::Android);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_jid_is_echoed() {
        let jid = "  weird jid / with:stuff  ";
        assert_eq!(service(Identity, 0.7).predict(jid, &sessions(1)).jid, jid);
        assert_eq!(service(Identity, 0.7).predict_file(jid, Path::new("/nope.json")).jid, jid);
    }

    #[test]
    fn test_diagnostic_features() {
        let result = service(Identity, 0.7).predict("jid", &sessions(3));
        let features = result.features.unwrap();
        assert_eq!(features.session_count, 3.0);
        assert_eq!(features.active_sessions, 3.0);
        assert_eq!(features.avg_chains, 1.0);
        assert_eq!(features.multi_chain_count, 0.0);
    }

    #[test]
    fn test_empty_container_still_scores() {
        let svc = service(Identity, 0.3);
        let result = svc.predict("jid", &json!({}));
        assert_eq!(result.os_type, OsType::Android);
        assert_eq!(result.features.unwrap().session_count, 0.0);
    }

    #[test]
    fn test_score_rejects_non_finite() {
        let result = service(Identity, f64::NAN).predict("jid", &sessions(1));
        assert!(result.is_unknown());
        assert_eq!(result.confidence, 0.0);
        assert!(result.error.unwrap().contains("Non-finite score"));
        assert!(result.traceback.is_some());
    }

    #[test]
    fn test_scaler_output_length_checked() {
        let result = service(Truncating, 0.9).predict("jid", &sessions(1));
        assert!(result.is_unknown());
        assert!(result.error.unwrap().contains("scaler output"));
    }

    #[test]
    fn test_panic_is_contained() {
        let result = service(Exploding, 0.9).predict("jid", &sessions(1));
        assert!(result.is_unknown());
        assert_eq!(result.confidence, 0.0);
        assert!(result.error.unwrap().contains("scaler exploded"));
        assert!(result.traceback.unwrap().starts_with("panic: scaler exploded"));
    }

    #[test]
    fn test_panic_trace_points_at_panic_site() {
        let result = service(Exploding, 0.9).predict("jid", &sessions(1));
        let trace = result.traceback.unwrap();
        let header = trace.lines().next().unwrap();

        assert!(header.contains(file!()), "header: {}", header);
        // Recorded before unwinding, so the scaler frame is still on the stack
        assert!(trace.contains("transform"), "trace: {}", trace);
    }

    #[test]
    fn test_service_recovers_after_panic() {
        let _ = service(Exploding, 0.9).predict("jid", &sessions(1));
        let result = service(Identity, 0.9).predict("jid", &sessions(1));
        assert_eq!(result.os_type, OsType::Ios);
        assert!(result.traceback.is_none());
    }

    #[test]
    fn test_missing_session_file() {
        let dir = tempfile::tempdir().unwrap();
        write_linear_artifacts(dir.path());

        let missing = dir.path().join("session-missing.json");
        let result = disk_service(dir.path()).predict_file("jid", &missing);

        assert!(result.is_unknown());
        assert_eq!(result.confidence, 0.0);
        assert!(result.error.unwrap().starts_with("Session file not found"));
        assert!(result.features.is_none());
    }

    #[test]
    fn test_malformed_session_file() {
        let dir = tempfile::tempdir().unwrap();
        write_linear_artifacts(dir.path());
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{\"_sessions\": ").unwrap();

        let result = disk_service(dir.path()).predict_file("jid", &path);
        assert!(result.is_unknown());
        assert!(result.error.unwrap().starts_with("JSON error"));
        assert!(result.traceback.is_some());
    }

    #[test]
    fn test_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, sessions(2).to_string()).unwrap();

        let models = dir.path().join("models");
        let result = disk_service(&models).predict_file("jid", &path);

        assert!(result.is_unknown());
        assert_eq!(result.confidence, 0.0);
        assert!(result.error.unwrap().contains(&models.display().to_string()));
        assert_eq!(result.model_exists, Some(false));
        assert_eq!(result.scaler_exists, Some(false));
        assert_eq!(result.expected_files.unwrap().len(), 2);
        assert_eq!(result.features.unwrap().session_count, 2.0);
    }

    #[test]
    fn test_end_to_end_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        write_linear_artifacts(dir.path());
        let svc = disk_service(dir.path());

        let busy = dir.path().join("busy.json");
        std::fs::write(&busy, sessions(3).to_string()).unwrap();
        let result = svc.predict_file("busy", &busy);
        // sigmoid(3 - 2.5)
        let expected = 1.0 / (1.0 + (-0.5f64).exp());
        assert_eq!(result.os_type, OsType::Ios);
        assert_eq!(result.method, "linear_ml");
        assert!((result.prediction_score.unwrap() - expected).abs() < 1e-12);
        assert!((result.confidence - (expected - 0.5) * 2.0).abs() < 1e-12);

        let quiet = dir.path().join("quiet.json");
        std::fs::write(&quiet, sessions(1).to_string()).unwrap();
        let result = svc.predict_file("quiet", &quiet);
        assert_eq!(result.os_type, OsType::Android);
    }

    #[test]
    fn test_repeated_predictions_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        write_linear_artifacts(dir.path());
        let path = dir.path().join("session.json");
        std::fs::write(&path, sessions(4).to_string()).unwrap();

        let svc = disk_service(dir.path());
        let first = svc.predict_file("jid", &path);
        for _ in 0..3 {
            assert_eq!(svc.predict_file("jid", &path), first);
        }
    }

    #[test]
    fn test_score_matches_extracted_vector() {
        let svc = service(Identity, 0.66);
        let container = sessions(2);
        let score = svc.score(&extract_features(&container)).unwrap();
        assert_eq!(score.value, 0.66);
        assert_eq!(score.method, "constant");
    }
}
