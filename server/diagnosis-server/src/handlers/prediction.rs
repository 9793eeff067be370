use axum::{
    extract::{rejection::FormRejection, State},
    http::HeaderMap,
    Form, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use symptom_predictor::{RankedCause, SymptomReport};

use crate::auth::scopes;
use crate::error::{ApiError, ApiResult};
use crate::server::DiagnosisServer;

/// Form body of `POST /predict-cause`
#[derive(Debug, Deserialize)]
pub struct PredictCauseForm {
    pub subjective_symptoms: Option<String>,
    pub objective_symptoms: Option<String>,
    pub gender: Option<String>,
}

impl PredictCauseForm {
    pub fn into_report(self) -> ApiResult<SymptomReport> {
        Ok(SymptomReport {
            subjective_symptoms: self
                .subjective_symptoms
                .ok_or_else(|| ApiError::missing_field("subjective_symptoms"))?,
            objective_symptoms: self
                .objective_symptoms
                .ok_or_else(|| ApiError::missing_field("objective_symptoms"))?,
            gender: self.gender.ok_or_else(|| ApiError::missing_field("gender"))?,
        })
    }
}

/// Rank the three most probable causes for the submitted symptoms
pub async fn predict_cause(
    State(server): State<DiagnosisServer>,
    headers: HeaderMap,
    form: Result<Form<PredictCauseForm>, FormRejection>,
) -> ApiResult<Json<Vec<RankedCause>>> {
    server.access.require_scope(&headers, scopes::PREDICT_CAUSE)?;

    let Form(form) = form.map_err(|e| ApiError::invalid_format(e.body_text()))?;
    let report = form.into_report()?;

    let predictor = Arc::clone(&server.predictor);
    let ranked = tokio::task::spawn_blocking(move || predictor.predict_cause(&report))
        .await
        .map_err(|e| ApiError::internal(format!("prediction task failed: {}", e)))??;
    Ok(Json(ranked))
}
