use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use error_common::{codes, CareError};
use serde::{Deserialize, Serialize};
use symptom_predictor::PredictorError;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    pub error_type: String,
    /// Stable machine-readable code, e.g. `VALIDATION_1004`
    pub error_code: String,
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation { message: String, code: &'static str },

    #[error("Authentication error: {message}")]
    Authentication { message: String, code: &'static str },

    #[error("Authorization error: {message}")]
    Authorization { message: String },

    #[error("Resource not found: {resource_type}")]
    NotFound { resource_type: String },

    #[error("Prediction error: {0}")]
    Prediction(PredictorError),

    #[error("Reference data error: {0}")]
    ReferenceData(#[from] CareError),

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            message: format!("missing required field '{}'", field),
            code: codes::validation::MISSING_REQUIRED_FIELD,
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: codes::validation::INVALID_FORMAT,
        }
    }

    pub fn missing_token() -> Self {
        Self::Authentication {
            message: "bearer token required".to_string(),
            code: codes::authentication::MISSING_TOKEN,
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: codes::authentication::INVALID_TOKEN,
        }
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Authorization { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Prediction(e) if e.is_user_error() => StatusCode::BAD_REQUEST,
            ApiError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ReferenceData(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::Authorization { .. } => "authorization_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Prediction(e) if e.is_user_error() => "validation_error",
            ApiError::Prediction(_) => "prediction_error",
            ApiError::ReferenceData(_) => "reference_data_error",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { code, .. } => *code,
            ApiError::Authentication { code, .. } => *code,
            ApiError::Authorization { .. } => codes::authorization::INSUFFICIENT_SCOPE,
            ApiError::NotFound { .. } => codes::resource::NOT_FOUND,
            ApiError::Prediction(PredictorError::UnknownSymptom { .. }) => {
                codes::validation::UNKNOWN_SYMPTOM
            }
            ApiError::Prediction(
                PredictorError::Artifact { .. }
                | PredictorError::InvalidVocabulary(_)
                | PredictorError::InvalidModel(_)
                | PredictorError::IncompatibleArtifacts(_),
            ) => codes::prediction::ARTIFACT_INVALID,
            ApiError::Prediction(_) => codes::prediction::INFERENCE_FAILED,
            ApiError::ReferenceData(_) | ApiError::Internal { .. } => codes::system::INTERNAL,
        }
    }

    /// Get suggested actions for resolving the error
    pub fn suggestions(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Validation { .. } => Some(vec![
                "Check the form fields subjective_symptoms, objective_symptoms and gender"
                    .to_string(),
            ]),
            ApiError::Prediction(e) if e.is_user_error() => Some(vec![
                "Use symptoms listed by /read-all-subjective-symptoms and /read-all-objective-symptoms"
                    .to_string(),
                "Separate multiple symptoms with the configured separator".to_string(),
            ]),
            ApiError::Authentication { .. } => Some(vec![
                "Send an access token in the Authorization: Bearer header".to_string(),
                "Check if your token has expired".to_string(),
            ]),
            ApiError::Authorization { .. } => Some(vec![
                "Request a token that carries the required scope".to_string(),
            ]),
            ApiError::NotFound { .. } => Some(vec![
                "Verify the identifiers in the request path".to_string(),
            ]),
            _ => None,
        }
    }

    /// Message shown to clients; system faults are not described in detail
    fn public_message(&self) -> String {
        match self {
            ApiError::Prediction(e) if e.is_user_error() => e.to_string(),
            ApiError::Prediction(_) => "prediction failed".to_string(),
            ApiError::ReferenceData(_) | ApiError::Internal { .. } => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<PredictorError> for ApiError {
    fn from(error: PredictorError) -> Self {
        ApiError::Prediction(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "API error occurred"
            );
        } else {
            warn!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                "Request rejected"
            );
        }

        let body = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            error_code: self.error_code().to_string(),
            message: self.public_message(),
            timestamp: chrono::Utc::now(),
            suggestions: self.suggestions(),
        };

        (status_code, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_symptom_is_bad_request() {
        let error = ApiError::from(PredictorError::UnknownSymptom {
            token: "sore throat".to_string(),
        });

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.error_type(), "validation_error");
        assert_eq!(error.error_code(), codes::validation::UNKNOWN_SYMPTOM);
        assert_eq!(
            error.public_message(),
            "invalid or unknown symptom - sore throat"
        );
    }

    #[test]
    fn test_inference_failure_hides_detail() {
        let error = ApiError::from(PredictorError::Inference("nan in logits".to_string()));

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.public_message(), "prediction failed");
        assert!(error.suggestions().is_none());
    }

    #[test]
    fn test_auth_status_codes() {
        assert_eq!(ApiError::missing_token().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::missing_token().error_code(),
            codes::authentication::MISSING_TOKEN
        );
        assert_eq!(
            ApiError::authorization("missing scope").status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_reference_data_error_is_internal() {
        let error = ApiError::from(CareError::ReferenceDataError("unreadable".to_string()));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_code(), codes::system::INTERNAL);
        assert_eq!(error.public_message(), "internal server error");
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let error = ApiError::internal("prediction task panicked");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_type(), "internal_error");
        assert_eq!(error.error_code(), codes::system::INTERNAL);
        assert_eq!(error.public_message(), "internal server error");
    }
}
