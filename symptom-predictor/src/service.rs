use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use logger_redacted::PhiRedactor;

use crate::classifier::{Classifier, DenseClassifier};
use crate::config::PredictorConfig;
use crate::encoder::{canonicalize, EncodedSequence, EncoderSettings, SequenceEncoder};
use crate::error::{PredictorError, PredictorResult};
use crate::ranker::{rank_top_n, RankedCause, RANKED_CAUSES};
use crate::vocabulary::Vocabulary;

/// Patient-reported input of one prediction request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomReport {
    pub subjective_symptoms: String,
    pub objective_symptoms: String,
    pub gender: String,
}

impl SymptomReport {
    /// Fields in the order the model was trained on
    pub fn fields(&self) -> [&str; 3] {
        [
            self.subjective_symptoms.as_str(),
            self.objective_symptoms.as_str(),
            self.gender.as_str(),
        ]
    }
}

/// Loaded vocabularies and model, shared read-only by every request
pub struct SymptomPredictor {
    symptoms: Vocabulary,
    causes: Vocabulary,
    classifier: Box<dyn Classifier>,
    settings: EncoderSettings,
    redactor: PhiRedactor,
}

impl SymptomPredictor {
    pub fn new(
        symptoms: Vocabulary,
        causes: Vocabulary,
        classifier: Box<dyn Classifier>,
        settings: EncoderSettings,
    ) -> Self {
        Self {
            symptoms,
            causes,
            classifier,
            settings,
            redactor: PhiRedactor::default(),
        }
    }

    pub fn with_redactor(mut self, redactor: PhiRedactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Read all artifacts named by `config` and verify they belong together
    pub fn load(config: &PredictorConfig) -> PredictorResult<Self> {
        config.validate()?;

        let symptoms = Vocabulary::load(&config.symptoms_tokeniser_file)?;
        let causes = Vocabulary::load(&config.causes_tokeniser_file)?;
        let classifier = DenseClassifier::load(&config.model_file)?;

        check_compatibility(&symptoms, &causes, &classifier, config)?;

        tracing::info!(
            symptoms = symptoms.len(),
            causes = causes.len(),
            max_length = config.symptoms_sequence_maxlen,
            padding = %config.symptoms_sequence_padding_type,
            "Predictor artifacts loaded"
        );

        Ok(Self::new(
            symptoms,
            causes,
            Box::new(classifier),
            config.encoder_settings(),
        ))
    }

    pub fn symptoms(&self) -> &Vocabulary {
        &self.symptoms
    }

    pub fn causes(&self) -> &Vocabulary {
        &self.causes
    }

    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    pub fn encode<S: AsRef<str>>(&self, fields: &[S]) -> PredictorResult<EncodedSequence> {
        SequenceEncoder::new(&self.symptoms, self.settings).encode(fields)
    }

    /// Top causes for the given fields, most probable first
    pub fn predict<S: AsRef<str>>(&self, fields: &[S]) -> PredictorResult<Vec<RankedCause>> {
        let started = Instant::now();
        let corpus = canonicalize(fields, self.settings.separator);
        let correlation = self.redactor.redact_field(&corpus);

        tracing::info!(input = %correlation, "Starting predict cause");
        tracing::debug!(
            fields = fields.len(),
            corpus = %correlation,
            "Canonical corpus built"
        );

        let sequence = match SequenceEncoder::new(&self.symptoms, self.settings).encode_corpus(&corpus)
        {
            Ok(sequence) => sequence,
            Err(PredictorError::UnknownSymptom { token }) => {
                tracing::warn!(
                    input = %correlation,
                    token = %self.redactor.redact_field(&token),
                    "Rejected unknown symptom"
                );
                return Err(PredictorError::UnknownSymptom { token });
            }
            Err(e) => return Err(e),
        };

        let distribution = self.classifier.predict(&sequence)?;
        let ranked = rank_top_n(&distribution, RANKED_CAUSES, &self.causes)?;

        tracing::info!(
            input = %correlation,
            duration_ms = started.elapsed().as_millis() as u64,
            "Complete predict cause"
        );
        Ok(ranked)
    }

    pub fn predict_cause(&self, report: &SymptomReport) -> PredictorResult<Vec<RankedCause>> {
        self.predict(&report.fields())
    }
}

impl fmt::Debug for SymptomPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymptomPredictor")
            .field("symptoms", &self.symptoms.len())
            .field("causes", &self.causes.len())
            .field("classes", &self.classifier.num_classes())
            .field("settings", &self.settings)
            .finish()
    }
}

fn check_compatibility(
    symptoms: &Vocabulary,
    causes: &Vocabulary,
    classifier: &DenseClassifier,
    config: &PredictorConfig,
) -> PredictorResult<()> {
    if classifier.embedding_rows() != symptoms.len() + 1 {
        return Err(PredictorError::IncompatibleArtifacts(format!(
            "embedding has {} rows but the symptom vocabulary has {} tokens (+1 padding)",
            classifier.embedding_rows(),
            symptoms.len()
        )));
    }
    if classifier.num_classes() != causes.len() {
        return Err(PredictorError::IncompatibleArtifacts(format!(
            "model predicts {} classes but the cause vocabulary has {} entries",
            classifier.num_classes(),
            causes.len()
        )));
    }
    if let Some(input_length) = classifier.input_length() {
        if input_length != config.symptoms_sequence_maxlen {
            return Err(PredictorError::IncompatibleArtifacts(format!(
                "model was built for sequences of length {}, configured maxlen is {}",
                input_length, config.symptoms_sequence_maxlen
            )));
        }
    }

    match classifier.fingerprints() {
        Some(recorded) if config.verify_fingerprints => {
            if recorded.symptoms != symptoms.fingerprint() {
                return Err(PredictorError::IncompatibleArtifacts(
                    "symptom vocabulary differs from the one the model was trained with"
                        .to_string(),
                ));
            }
            if recorded.causes != causes.fingerprint() {
                return Err(PredictorError::IncompatibleArtifacts(
                    "cause vocabulary differs from the one the model was trained with".to_string(),
                ));
            }
        }
        Some(_) => tracing::warn!("Vocabulary fingerprint verification disabled"),
        None => tracing::debug!("Model artifact records no vocabulary fingerprints"),
    }

    Ok(())
}
