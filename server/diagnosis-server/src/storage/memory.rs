use async_trait::async_trait;
use error_common::{CareError, Result};
use std::path::Path;

use super::{Drug, Etiology, ObjectiveSymptom, ReferenceData, ReferenceStore, SubjectiveSymptom};

/// Reference store held entirely in memory, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceStore {
    data: ReferenceData,
}

impl InMemoryReferenceStore {
    pub fn new(data: ReferenceData) -> Self {
        Self { data }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: ReferenceData = serde_json::from_str(json)
            .map_err(|e| CareError::ReferenceDataError(format!("malformed reference data: {}", e)))?;
        Ok(Self::new(data))
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            CareError::ReferenceDataError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let store = Self::from_json(&json)?;

        tracing::info!(
            path = %path.display(),
            subjective_symptoms = store.data.subjective_symptoms.len(),
            objective_symptoms = store.data.objective_symptoms.len(),
            etiologies = store.data.etiologies.len(),
            drugs = store.data.drugs.len(),
            "Reference data loaded"
        );
        Ok(store)
    }
}

#[async_trait]
impl ReferenceStore for InMemoryReferenceStore {
    async fn subjective_symptoms(&self) -> Result<Vec<SubjectiveSymptom>> {
        Ok(self.data.subjective_symptoms.clone())
    }

    async fn objective_symptoms(&self) -> Result<Vec<ObjectiveSymptom>> {
        Ok(self.data.objective_symptoms.clone())
    }

    async fn etiologies(&self) -> Result<Vec<Etiology>> {
        Ok(self.data.etiologies.clone())
    }

    async fn etiology(
        &self,
        subjective_symptom_id: &str,
        cause: &str,
    ) -> Result<Option<Etiology>> {
        let cause = cause.trim().to_lowercase();
        Ok(self
            .data
            .etiologies
            .iter()
            .find(|e| {
                e.subjective_symptom_id == subjective_symptom_id
                    && e.cause.trim().to_lowercase() == cause
            })
            .cloned())
    }

    async fn drugs(&self, etiology_id: &str) -> Result<Vec<Drug>> {
        Ok(self
            .data
            .drugs
            .iter()
            .filter(|d| d.etiology_id == etiology_id)
            .cloned()
            .collect())
    }
}
