use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{health, prediction, reference},
    server::DiagnosisServer,
};

/// Create health check routes
pub fn health_routes() -> Router<DiagnosisServer> {
    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .route("/version", get(health::version_info))
}

/// Create prediction and access token routes
pub fn prediction_routes() -> Router<DiagnosisServer> {
    Router::new()
        .route("/predict-cause", post(prediction::predict_cause))
        .route(
            "/validate-access-token/:asserted_claims",
            get(reference::validate_access_token),
        )
}

/// Create reference data routes
pub fn reference_routes() -> Router<DiagnosisServer> {
    Router::new()
        .route(
            "/read-all-subjective-symptoms",
            get(reference::read_all_subjective_symptoms),
        )
        .route(
            "/read-all-objective-symptoms",
            get(reference::read_all_objective_symptoms),
        )
        .route("/read-all-etiologies", get(reference::read_all_etiologies))
        .route(
            "/read-etiology/:subjective_symptom_id/:cause",
            get(reference::read_etiology),
        )
        .route("/read-drugs/:etiology_id", get(reference::read_drugs))
}

/// Create all routes
pub fn create_routes() -> Router<DiagnosisServer> {
    Router::new()
        .merge(health_routes())
        .merge(prediction_routes())
        .merge(reference_routes())
}
