use thiserror::Error;

/// Process-level error enum shared by the service binaries
#[derive(Error, Debug)]
pub enum CareError {
    /// Network communication errors (binding, accepting)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server runtime errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Model or vocabulary artifacts could not be loaded
    #[error("Artifact error: {0}")]
    ArtifactError(String),

    /// Reference data could not be loaded
    #[error("Reference data error: {0}")]
    ReferenceDataError(String),

    /// Logging could not be initialised
    #[error("Logging error: {0}")]
    LoggingError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CareError {
    /// Short machine-readable category, used as a structured log field
    pub fn category(&self) -> &'static str {
        match self {
            CareError::NetworkError(_) => "network",
            CareError::ServerError(_) => "server",
            CareError::ConfigError(_) => "config",
            CareError::ArtifactError(_) => "artifact",
            CareError::ReferenceDataError(_) => "reference_data",
            CareError::LoggingError(_) => "logging",
            CareError::Other(_) => "other",
        }
    }
}

/// Result type alias for service bootstrap operations
pub type Result<T> = std::result::Result<T, CareError>;

/// Log a startup failure with its category before the process exits
pub fn log_error(context: &str, error: &CareError) {
    tracing::error!(
        context = context,
        category = error.category(),
        error = %error,
        "Startup failed"
    );
}
