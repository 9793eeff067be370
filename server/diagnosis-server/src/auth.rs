//! Bearer token checks for the API routes
//!
//! Access tokens are HS256 JWTs whose `scope` claim lists the granted scopes
//! separated by spaces. Without a configured secret every check passes.

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ApiError;

pub mod scopes {
    pub const READ_SUBJECTIVE_SYMPTOMS: &str = "read:subjective_symptoms";
    pub const READ_OBJECTIVE_SYMPTOMS: &str = "read:objective_symptoms";
    pub const PREDICT_CAUSE: &str = "predict:cause";
    pub const READ_ETIOLOGIES: &str = "read:etiologies";
    pub const READ_DRUGS: &str = "read:drugs";
}

/// Claims read from an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Space-separated granted scopes
    #[serde(default)]
    pub scope: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl AccessClaims {
    pub fn has_scope(&self, required: &str) -> bool {
        self.scope.split_whitespace().any(|granted| granted == required)
    }
}

/// Signature and registered-claim validation for access tokens
#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &str, issuer: Option<&str>, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<AccessClaims, ApiError> {
        decode::<AccessClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ApiError::invalid_token(format!("invalid access token: {}", e)))
    }
}

impl fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenValidator")
            .field("issuer", &self.validation.iss)
            .field("audience", &self.validation.aud)
            .finish()
    }
}

/// Token from an `Authorization: Bearer <token>` header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Scope enforcement shared by all protected routes
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    validator: Option<TokenValidator>,
}

impl AccessControl {
    pub fn new(validator: Option<TokenValidator>) -> Self {
        Self { validator }
    }

    /// Every request is allowed
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.validator.is_some()
    }

    /// Fail unless the request carries a valid token granting `scope`
    pub fn require_scope(&self, headers: &HeaderMap, scope: &str) -> Result<(), ApiError> {
        let Some(validator) = &self.validator else {
            return Ok(());
        };

        let token = bearer_token(headers).ok_or_else(ApiError::missing_token)?;
        let claims = validator.validate(token)?;

        if !claims.has_scope(scope) {
            tracing::debug!(
                required = scope,
                subject = claims.sub.as_deref().unwrap_or("unknown"),
                "Token lacks required scope"
            );
            return Err(ApiError::authorization(format!(
                "token does not grant scope '{}'",
                scope
            )));
        }
        Ok(())
    }
}
