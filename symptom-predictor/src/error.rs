use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    /// An input token is absent from the symptom vocabulary
    #[error("invalid or unknown symptom - {token}")]
    UnknownSymptom { token: String },

    #[error("Failed to load artifact {path}: {message}")]
    Artifact { path: String, message: String },

    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Incompatible artifacts: {0}")]
    IncompatibleArtifacts(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Ranking needs {required} classes but the distribution has {available}")]
    InsufficientClasses { required: usize, available: usize },

    #[error("Class id {id} has no label in the cause vocabulary")]
    UnmappedClass { id: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PredictorError {
    /// True when the caller sent bad input, false for system faults
    pub fn is_user_error(&self) -> bool {
        matches!(self, PredictorError::UnknownSymptom { .. })
    }

    pub(crate) fn artifact(path: &std::path::Path, message: impl Into<String>) -> Self {
        PredictorError::Artifact {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}

pub type PredictorResult<T> = Result<T, PredictorError>;
