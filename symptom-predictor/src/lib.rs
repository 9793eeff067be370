//! Symptom-to-cause prediction for the diagnosis service
//!
//! Turns free-text symptom fields into a ranked list of probable causes:
//!
//! - **Vocabulary**: token ⇄ id index loaded from the training tokenizers
//! - **Encoding**: normalisation, unknown-symptom validation and padding
//! - **Classification**: embedding → average pooling → dense → softmax
//! - **Ranking**: top three causes with percentage confidences
//!
//! # Example
//!
//! ```rust,no_run
//! use symptom_predictor::{PredictorConfig, SymptomPredictor, SymptomReport};
//!
//! # fn main() -> Result<(), symptom_predictor::PredictorError> {
//! let predictor = SymptomPredictor::load(&PredictorConfig::default())?;
//!
//! let report = SymptomReport {
//!     subjective_symptoms: "vomiting".to_string(),
//!     objective_symptoms: "cramping".to_string(),
//!     gender: "female".to_string(),
//! };
//! for cause in predictor.predict_cause(&report)? {
//!     println!("{} {}", cause.label, cause.confidence);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod ranker;
pub mod service;
pub mod vocabulary;

pub use classifier::{
    ArtifactFingerprints, Classifier, DenseClassifier, DenseLayer, Distribution, ModelArtifact,
};
pub use config::{Padding, PredictorConfig};
pub use encoder::{canonicalize, pad_sequence, EncodedSequence, EncoderSettings, SequenceEncoder};
pub use error::{PredictorError, PredictorResult};
pub use ranker::{rank_top_n, Confidence, RankedCause, RANKED_CAUSES};
pub use service::{SymptomPredictor, SymptomReport};
pub use vocabulary::Vocabulary;
