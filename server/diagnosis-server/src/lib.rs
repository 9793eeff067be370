//! Diagnosis Server - symptom to cause prediction API
//!
//! Serves the trained symptom classifier over HTTP together with the
//! clinical reference data (symptoms, etiologies, drugs) the front end
//! needs to explain a prediction.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod settings;
pub mod storage;

// Re-export commonly used types
pub use error::*;
pub use server::DiagnosisServer;
pub use settings::Settings;

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: DiagnosisServer) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer())
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
