use axum::{extract::Request, middleware::Next, response::Response};
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};

/// Request timing middleware
pub async fn request_timing_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    // Path only; query strings may carry symptoms
    tracing::info!(
        method = %method,
        path = %path,
        duration_ms = start.elapsed().as_millis() as u64,
        status = response.status().as_u16(),
        "Request processed"
    );

    response
}

/// Permissive CORS for the browser front end
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}
