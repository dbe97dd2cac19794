//! HTTP handlers for notekeep-api.

pub mod notes;

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::error::{ErrorBody, ROUTE_NOT_FOUND};

pub const ROOT_MESSAGE: &str = "Notes API is running";

/// Liveness text at `/`.
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Envelope for paths no route matches.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new(ROUTE_NOT_FOUND, None)),
    )
}
