//! Liveness and not-found handlers

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};

pub const LIVENESS_MESSAGE: &str =
    "Review polisher is running and ready to polish reviews and record submissions.";

/// GET /
pub async fn liveness() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], LIVENESS_MESSAGE)
}

/// Fallback for unknown paths and unsupported methods
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
