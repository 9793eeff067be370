use config::{Config, Environment, File, Map};
use error_common::{CareError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use symptom_predictor::{Padding, PredictorConfig};

/// Effective service settings
///
/// Layered as built-in defaults, then an optional config file, then
/// environment variables (`PORT`, `MODEL_FILE`, `AUTH_JWT_SECRET`, ...).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub debug_mode: bool,
    pub model_file: PathBuf,
    pub symptoms_tokeniser_file: PathBuf,
    pub causes_tokeniser_file: PathBuf,
    pub symptoms_separator: char,
    pub symptoms_sequence_padding_type: String,
    pub symptoms_sequence_maxlen: usize,
    pub verify_fingerprints: bool,
    pub reference_data_file: PathBuf,
    pub auth_jwt_secret: Option<String>,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let predictor = PredictorConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            debug_mode: false,
            model_file: predictor.model_file,
            symptoms_tokeniser_file: predictor.symptoms_tokeniser_file,
            causes_tokeniser_file: predictor.causes_tokeniser_file,
            symptoms_separator: predictor.symptoms_separator,
            symptoms_sequence_padding_type: predictor.symptoms_sequence_padding_type.to_string(),
            symptoms_sequence_maxlen: predictor.symptoms_sequence_maxlen,
            verify_fingerprints: predictor.verify_fingerprints,
            reference_data_file: PathBuf::from("data/reference_data.json"),
            auth_jwt_secret: None,
            auth_issuer: None,
            auth_audience: None,
        }
    }
}

impl Settings {
    /// Load from an optional file plus the process environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::from_sources(config_file, None)
    }

    /// Load with an explicit environment map instead of the process one
    pub fn from_sources(
        config_file: Option<&Path>,
        environment: Option<Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::default().source(environment));

        let settings: Settings = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| CareError::ConfigError(e.to_string()))?;

        settings.predictor_config()?;
        Ok(settings)
    }

    pub fn predictor_config(&self) -> Result<PredictorConfig> {
        let padding: Padding = self
            .symptoms_sequence_padding_type
            .parse()
            .map_err(|e: symptom_predictor::PredictorError| CareError::ConfigError(e.to_string()))?;

        let config = PredictorConfig {
            model_file: self.model_file.clone(),
            symptoms_tokeniser_file: self.symptoms_tokeniser_file.clone(),
            causes_tokeniser_file: self.causes_tokeniser_file.clone(),
            symptoms_separator: self.symptoms_separator,
            symptoms_sequence_padding_type: padding,
            symptoms_sequence_maxlen: self.symptoms_sequence_maxlen,
            verify_fingerprints: self.verify_fingerprints,
        };
        config
            .validate()
            .map_err(|e| CareError::ConfigError(e.to_string()))?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Write every effective setting at debug level, secrets masked
    pub fn log_effective(&self) {
        tracing::debug!(
            host = %self.host,
            port = self.port,
            debug_mode = self.debug_mode,
            model_file = %self.model_file.display(),
            symptoms_tokeniser_file = %self.symptoms_tokeniser_file.display(),
            causes_tokeniser_file = %self.causes_tokeniser_file.display(),
            symptoms_separator = %self.symptoms_separator,
            symptoms_sequence_padding_type = %self.symptoms_sequence_padding_type,
            symptoms_sequence_maxlen = self.symptoms_sequence_maxlen,
            verify_fingerprints = self.verify_fingerprints,
            reference_data_file = %self.reference_data_file.display(),
            auth_jwt_secret = if self.auth_jwt_secret.is_some() { "***" } else { "unset" },
            auth_issuer = self.auth_issuer.as_deref().unwrap_or("unset"),
            auth_audience = self.auth_audience.as_deref().unwrap_or("unset"),
            "Effective configuration"
        );
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("debug_mode", &self.debug_mode)
            .field("model_file", &self.model_file)
            .field("symptoms_sequence_maxlen", &self.symptoms_sequence_maxlen)
            .field("reference_data_file", &self.reference_data_file)
            .field("auth_enabled", &self.auth_jwt_secret.is_some())
            .finish_non_exhaustive()
    }
}
