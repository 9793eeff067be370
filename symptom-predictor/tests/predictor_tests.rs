use std::path::{Path, PathBuf};

use symptom_predictor::{
    ModelArtifact, Padding, PredictorConfig, PredictorError, SymptomPredictor, SymptomReport,
    Vocabulary,
};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_config() -> PredictorConfig {
    PredictorConfig {
        model_file: fixture("model.json"),
        symptoms_tokeniser_file: fixture("symptoms_tokeniser.json"),
        causes_tokeniser_file: fixture("causes_tokeniser.json"),
        ..PredictorConfig::default()
    }
}

fn fixture_model() -> ModelArtifact {
    let json = std::fs::read_to_string(fixture("model.json")).unwrap();
    serde_json::from_str(&json).unwrap()
}

/// Config pointing at a copy of the fixture model altered by `edit`
fn config_with_model(dir: &TempDir, edit: impl FnOnce(&mut ModelArtifact)) -> PredictorConfig {
    let mut model = fixture_model();
    edit(&mut model);
    let path = dir.path().join("model.json");
    std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();

    PredictorConfig {
        model_file: path,
        ..fixture_config()
    }
}

fn report(subjective: &str, objective: &str, gender: &str) -> SymptomReport {
    SymptomReport {
        subjective_symptoms: subjective.to_string(),
        objective_symptoms: objective.to_string(),
        gender: gender.to_string(),
    }
}

#[test]
fn test_load_fixture_artifacts() {
    let predictor = SymptomPredictor::load(&fixture_config()).unwrap();

    assert_eq!(predictor.symptoms().len(), 8);
    assert_eq!(predictor.causes().len(), 4);
    assert_eq!(predictor.causes().lookup_token(4), Some("fever|influenza"));
    assert_eq!(predictor.settings().max_length, 9);
}

#[test]
fn test_gastric_symptoms_rank_food_poisoning_first() {
    let predictor = SymptomPredictor::load(&fixture_config()).unwrap();

    let ranked = predictor
        .predict_cause(&report("vomiting", "cramping", "female"))
        .unwrap();

    let labels: Vec<&str> = ranked.iter().map(|r| r.label.as_str()).collect();
    let confidences: Vec<f64> = ranked.iter().map(|r| r.confidence.value()).collect();

    // Migraine and influenza tie; the lower id wins
    assert_eq!(
        labels,
        ["vomiting|food poisoning", "vomiting|gastritis", "headache|migraine"]
    );
    assert_eq!(confidences, [61.03, 22.45, 8.26]);
}

#[test]
fn test_fever_symptoms_rank_influenza_first() {
    let predictor = SymptomPredictor::load(&fixture_config()).unwrap();

    let ranked = predictor
        .predict_cause(&report("fever", "headache", "male"))
        .unwrap();

    let labels: Vec<&str> = ranked.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        ["fever|influenza", "headache|migraine", "vomiting|food poisoning"]
    );
    assert_eq!(ranked[0].confidence.value(), 52.12);
    assert!(ranked
        .windows(2)
        .all(|pair| pair[0].confidence >= pair[1].confidence));
}

#[test]
fn test_messy_input_matches_clean_input() {
    let predictor = SymptomPredictor::load(&fixture_config()).unwrap();

    let messy = predictor
        .predict_cause(&report("  Vomiting ; Feeling Nausea", "DIARRHOEA ", " Female"))
        .unwrap();
    let clean = predictor
        .predict(&["vomiting;feeling nausea", "diarrhoea", "female"])
        .unwrap();

    assert_eq!(messy, clean);
}

#[test]
fn test_predictions_are_deterministic() {
    let predictor = SymptomPredictor::load(&fixture_config()).unwrap();
    let input = report("vomiting;cramping", "diarrhoea", "male");

    let first = predictor.predict_cause(&input).unwrap();
    for _ in 0..5 {
        assert_eq!(predictor.predict_cause(&input).unwrap(), first);
    }
}

#[test]
fn test_unknown_symptom_is_named() {
    let predictor = SymptomPredictor::load(&fixture_config()).unwrap();

    let err = predictor
        .predict_cause(&report("vomiting", "Sore Throat", "female"))
        .unwrap_err();

    assert!(err.is_user_error());
    assert_eq!(err.to_string(), "invalid or unknown symptom - sore throat");
}

#[test]
fn test_fixture_fingerprints_match_vocabularies() {
    let model = fixture_model();
    let recorded = model.fingerprints.unwrap();

    let symptoms = Vocabulary::load(&fixture("symptoms_tokeniser.json")).unwrap();
    let causes = Vocabulary::load(&fixture("causes_tokeniser.json")).unwrap();

    assert_eq!(recorded.symptoms, symptoms.fingerprint());
    assert_eq!(recorded.causes, causes.fingerprint());
}

#[test]
fn test_fingerprint_mismatch_fails_fast() {
    let dir = TempDir::new().unwrap();
    let config = config_with_model(&dir, |model| {
        if let Some(fingerprints) = model.fingerprints.as_mut() {
            fingerprints.causes = "0".repeat(64);
        }
    });

    let err = SymptomPredictor::load(&config).unwrap_err();
    assert!(matches!(err, PredictorError::IncompatibleArtifacts(_)));
    assert!(err.to_string().contains("cause vocabulary"));
}

#[test]
fn test_fingerprint_check_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let mut config = config_with_model(&dir, |model| {
        if let Some(fingerprints) = model.fingerprints.as_mut() {
            fingerprints.symptoms = "0".repeat(64);
        }
    });
    config.verify_fingerprints = false;

    assert!(SymptomPredictor::load(&config).is_ok());
}

#[test]
fn test_embedding_rows_must_match_vocabulary() {
    let dir = TempDir::new().unwrap();
    let config = config_with_model(&dir, |model| {
        model.embedding.push(vec![0.0, 0.0]);
    });

    let err = SymptomPredictor::load(&config).unwrap_err();
    assert!(err.to_string().contains("embedding has 10 rows"));
}

#[test]
fn test_input_length_must_match_maxlen() {
    let mut config = fixture_config();
    config.symptoms_sequence_maxlen = 12;

    let err = SymptomPredictor::load(&config).unwrap_err();
    assert!(matches!(err, PredictorError::IncompatibleArtifacts(_)));
}

#[test]
fn test_post_padding_without_declared_length() {
    let dir = TempDir::new().unwrap();
    let mut config = config_with_model(&dir, |model| {
        model.input_length = None;
    });
    config.symptoms_sequence_padding_type = Padding::Post;
    config.symptoms_sequence_maxlen = 12;

    let predictor = SymptomPredictor::load(&config).unwrap();
    let sequence = predictor.encode(&["fever", "male"]).unwrap();
    assert_eq!(sequence.ids(), &[7, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    let ranked = predictor.predict(&["fever", "male"]).unwrap();
    assert_eq!(ranked[0].label, "fever|influenza");
}

#[test]
fn test_missing_artifact_reports_path() {
    let config = PredictorConfig {
        model_file: PathBuf::from("/nonexistent/model.json"),
        ..fixture_config()
    };

    match SymptomPredictor::load(&config).unwrap_err() {
        PredictorError::Artifact { path, .. } => assert_eq!(path, "/nonexistent/model.json"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_tokeniser_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("symptoms_tokeniser.json");
    std::fs::write(&path, r#"{"config": {"word_index": "{\"vomiting\": 2}"}}"#).unwrap();

    let config = PredictorConfig {
        symptoms_tokeniser_file: path,
        ..fixture_config()
    };

    let err = SymptomPredictor::load(&config).unwrap_err();
    assert!(matches!(err, PredictorError::Artifact { .. }));
}
