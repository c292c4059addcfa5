//! The root!
//!
//! Health check and the catch-all for unknown routes

use axum::Json;
use axum::http::Uri;
use serde::Serialize;

use crate::api::Error;

/// Name of the service in the health check
const SERVICE_NAME: &str = "notice";

/// Health of the service
#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    service: &'static str,
}

/// Health check
///
/// Request:
/// ```sh
/// curl -v http://localhost:8000/
/// curl -v http://localhost:8000/health
/// ```
///
/// Response:
/// ```json
/// { "status": "ok", "service": "notice" }
/// ```
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: SERVICE_NAME,
    })
}

/// All requests without a matching route end up in this function
pub async fn fallback(uri: Uri) -> Error {
    tracing::debug!("No route for: {}", uri.path());

    Error::not_found("Not found")
}
