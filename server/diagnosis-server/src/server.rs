use error_common::{CareError, Result};
use logger_redacted::PhiRedactor;
use std::sync::Arc;
use std::time::Instant;
use symptom_predictor::SymptomPredictor;

use crate::auth::{AccessControl, TokenValidator};
use crate::settings::Settings;
use crate::storage::{InMemoryReferenceStore, ReferenceStore};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct DiagnosisServer {
    /// Loaded vocabularies and model, never mutated after startup
    pub predictor: Arc<SymptomPredictor>,
    pub reference: Arc<dyn ReferenceStore>,
    pub access: Arc<AccessControl>,
    pub started_at: Instant,
}

impl DiagnosisServer {
    pub fn new(
        predictor: SymptomPredictor,
        reference: Arc<dyn ReferenceStore>,
        access: AccessControl,
    ) -> Self {
        Self {
            predictor: Arc::new(predictor),
            reference,
            access: Arc::new(access),
            started_at: Instant::now(),
        }
    }

    /// Load every artifact named by `settings`; any failure aborts startup
    pub async fn from_settings(settings: &Settings, redactor: PhiRedactor) -> Result<Self> {
        let predictor_config = settings.predictor_config()?;
        let predictor = SymptomPredictor::load(&predictor_config)
            .map_err(|e| CareError::ArtifactError(e.to_string()))?
            .with_redactor(redactor);

        let reference = InMemoryReferenceStore::load(&settings.reference_data_file).await?;

        let access = match settings.auth_jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => AccessControl::new(Some(TokenValidator::new(
                secret,
                settings.auth_issuer.as_deref(),
                settings.auth_audience.as_deref(),
            ))),
            _ => {
                tracing::warn!("AUTH_JWT_SECRET not set, bearer token checks are disabled");
                AccessControl::disabled()
            }
        };

        Ok(Self::new(predictor, Arc::new(reference), access))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
