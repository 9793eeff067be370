use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::auth::{bearer_token, scopes};
use crate::error::{ApiError, ApiResult};
use crate::server::DiagnosisServer;
use crate::storage::{Drug, Etiology, ObjectiveSymptom, SubjectiveSymptom};

/// 200 when the bearer token is valid and grants `asserted_claims`, else 401
pub async fn validate_access_token(
    State(server): State<DiagnosisServer>,
    Path(asserted_claims): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    match server.access.require_scope(&headers, &asserted_claims) {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::debug!(
                asserted_claims = %asserted_claims,
                token_present = bearer_token(&headers).is_some(),
                reason = %e,
                "Access token validation failed"
            );
            StatusCode::UNAUTHORIZED
        }
    }
}

pub async fn read_all_subjective_symptoms(
    State(server): State<DiagnosisServer>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<SubjectiveSymptom>>> {
    server
        .access
        .require_scope(&headers, scopes::READ_SUBJECTIVE_SYMPTOMS)?;
    Ok(Json(server.reference.subjective_symptoms().await?))
}

pub async fn read_all_objective_symptoms(
    State(server): State<DiagnosisServer>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ObjectiveSymptom>>> {
    server
        .access
        .require_scope(&headers, scopes::READ_OBJECTIVE_SYMPTOMS)?;
    Ok(Json(server.reference.objective_symptoms().await?))
}

pub async fn read_all_etiologies(
    State(server): State<DiagnosisServer>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Etiology>>> {
    server.access.require_scope(&headers, scopes::READ_ETIOLOGIES)?;
    Ok(Json(server.reference.etiologies().await?))
}

pub async fn read_etiology(
    State(server): State<DiagnosisServer>,
    Path((subjective_symptom_id, cause)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Json<Etiology>> {
    server.access.require_scope(&headers, scopes::READ_ETIOLOGIES)?;

    server
        .reference
        .etiology(&subjective_symptom_id, &cause)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("etiology"))
}

pub async fn read_drugs(
    State(server): State<DiagnosisServer>,
    Path(etiology_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Drug>>> {
    server.access.require_scope(&headers, scopes::READ_DRUGS)?;
    Ok(Json(server.reference.drugs(&etiology_id).await?))
}
