//! Error types for revp-api
//!
//! Only two kinds of failure ever reach the caller: a request without usable
//! review text, and a failed synthesis call. Sink failures stay inside the
//! fan-out coordinator.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::synthesis::SynthesisError;

/// Message returned for requests without review text
pub const MISSING_TEXT_MESSAGE: &str = "Missing \"text\" in request body";

/// Message returned when the synthesis service fails
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "服务暂时不可用";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing required input (400)
    #[error("Missing \"text\" in request body")]
    MissingText,

    /// Generative service failure (500)
    #[error("Upstream error: {0}")]
    Upstream(#[from] SynthesisError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingText => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": MISSING_TEXT_MESSAGE })),
            )
                .into_response(),
            ApiError::Upstream(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": SERVICE_UNAVAILABLE_MESSAGE,
                    "details": err.to_string(),
                })),
            )
                .into_response(),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
