use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::HashMap;

use crate::server::DiagnosisServer;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime: u64,
    pub checks: HashMap<String, String>,
}

/// Version information response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
    pub features: Vec<String>,
}

pub async fn welcome() -> &'static str {
    "Welcome to backend api!"
}

pub async fn health_check(State(server): State<DiagnosisServer>) -> Json<HealthResponse> {
    let predictor = &server.predictor;
    let mut checks = HashMap::new();

    checks.insert(
        "symptom_vocabulary".to_string(),
        format!("{} tokens", predictor.symptoms().len()),
    );
    checks.insert(
        "cause_vocabulary".to_string(),
        format!("{} causes", predictor.causes().len()),
    );
    checks.insert(
        "access_control".to_string(),
        if server.access.is_enabled() {
            "enabled"
        } else {
            "disabled"
        }
        .to_string(),
    );

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.uptime_seconds(),
        checks,
    })
}

pub async fn version_info(State(server): State<DiagnosisServer>) -> Json<VersionResponse> {
    let mut features = vec![
        "predict-cause".to_string(),
        "reference-data".to_string(),
        "phi-redacted-logging".to_string(),
    ];
    if server.access.is_enabled() {
        features.push("bearer-scopes".to_string());
    }

    Json(VersionResponse {
        name: "Diagnosis Server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features,
    })
}
