use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::encoder::EncoderSettings;
use crate::error::{PredictorError, PredictorResult};

/// Side on which padding zeros are inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    /// Zeros first, token ids last
    #[default]
    Pre,
    /// Token ids first, zeros last
    Post,
}

impl FromStr for Padding {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pre" => Ok(Padding::Pre),
            "post" => Ok(Padding::Post),
            other => Err(PredictorError::Config(format!(
                "Unknown padding type: {} (expected 'pre' or 'post')",
                other
            ))),
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Padding::Pre => write!(f, "pre"),
            Padding::Post => write!(f, "post"),
        }
    }
}

/// Artifact locations and encoding parameters
///
/// Field names match the environment variables of the deployed service
/// (`MODEL_FILE`, `SYMPTOMS_SEPARATOR`, ...).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub model_file: PathBuf,
    pub symptoms_tokeniser_file: PathBuf,
    pub causes_tokeniser_file: PathBuf,
    pub symptoms_separator: char,
    pub symptoms_sequence_padding_type: Padding,
    pub symptoms_sequence_maxlen: usize,
    /// Compare vocabulary fingerprints recorded in the model artifact
    pub verify_fingerprints: bool,
}

impl PredictorConfig {
    pub fn validate(&self) -> PredictorResult<()> {
        if self.symptoms_sequence_maxlen == 0 {
            return Err(PredictorError::Config(
                "symptoms_sequence_maxlen must be greater than zero".to_string(),
            ));
        }
        if self.symptoms_separator.is_alphanumeric() {
            return Err(PredictorError::Config(format!(
                "symptoms_separator '{}' must not be alphanumeric",
                self.symptoms_separator
            )));
        }
        Ok(())
    }

    pub fn encoder_settings(&self) -> EncoderSettings {
        EncoderSettings {
            separator: self.symptoms_separator,
            padding: self.symptoms_sequence_padding_type,
            max_length: self.symptoms_sequence_maxlen,
        }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            model_file: PathBuf::from("data/model.json"),
            symptoms_tokeniser_file: PathBuf::from("data/symptoms_tokeniser.json"),
            causes_tokeniser_file: PathBuf::from("data/causes_tokeniser.json"),
            symptoms_separator: ';',
            symptoms_sequence_padding_type: Padding::Pre,
            symptoms_sequence_maxlen: 9,
            verify_fingerprints: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = PredictorConfig::default();
        assert_eq!(config.symptoms_separator, ';');
        assert_eq!(config.symptoms_sequence_padding_type, Padding::Pre);
        assert_eq!(config.symptoms_sequence_maxlen, 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_padding_parse() {
        assert_eq!("pre".parse::<Padding>().unwrap(), Padding::Pre);
        assert_eq!(" POST ".parse::<Padding>().unwrap(), Padding::Post);
        assert!("left".parse::<Padding>().is_err());
    }

    #[test]
    fn test_zero_maxlen_rejected() {
        let config = PredictorConfig {
            symptoms_sequence_maxlen: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PredictorError::Config(_))));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PredictorConfig = serde_json::from_str(
            r#"{"symptoms_separator": "|", "symptoms_sequence_padding_type": "post"}"#,
        )
        .unwrap();
        assert_eq!(config.symptoms_separator, '|');
        assert_eq!(config.symptoms_sequence_padding_type, Padding::Post);
        assert_eq!(config.symptoms_sequence_maxlen, 9);
    }
}
