//! Read-only clinical reference data: symptoms, etiologies and drugs

pub mod memory;

use async_trait::async_trait;
use error_common::Result;
use serde::{Deserialize, Serialize};

pub use memory::InMemoryReferenceStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectiveSymptom {
    pub id: String,
    pub symptom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveSymptom {
    pub id: String,
    pub symptom: String,
    pub subjective_symptom_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Etiology {
    pub id: String,
    pub cause: String,
    pub etiology: String,
    pub subjective_symptom_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drug {
    pub id: String,
    pub etiology_id: String,
    pub drug_category: String,
    pub drug_use: String,
    pub dose: String,
    pub mode_of_action: String,
}

/// Whole reference data set as persisted on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub subjective_symptoms: Vec<SubjectiveSymptom>,
    #[serde(default)]
    pub objective_symptoms: Vec<ObjectiveSymptom>,
    #[serde(default)]
    pub etiologies: Vec<Etiology>,
    #[serde(default)]
    pub drugs: Vec<Drug>,
}

/// Lookup interface over the reference collections
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn subjective_symptoms(&self) -> Result<Vec<SubjectiveSymptom>>;

    async fn objective_symptoms(&self) -> Result<Vec<ObjectiveSymptom>>;

    async fn etiologies(&self) -> Result<Vec<Etiology>>;

    /// Etiology of `cause` for one subjective symptom; `cause` matches
    /// case-insensitively
    async fn etiology(&self, subjective_symptom_id: &str, cause: &str)
        -> Result<Option<Etiology>>;

    async fn drugs(&self, etiology_id: &str) -> Result<Vec<Drug>>;
}
