//! POST /api/polish-review
//!
//! Validates the submission, hands it to the fan-out coordinator, then waits
//! for the synthesis service only. Sink progress never affects the response.

use axum::{body::Bytes, extract::State, Json};
use revp_common::Submission;
use tracing::{debug, error, info};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Polish review tags into a review
///
/// The body must be JSON with a non-empty string `text`; anything else is a
/// 400. On success the synthesis service's response object is returned as-is.
pub async fn polish_review(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<serde_json::Value>> {
    let value: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Request body is not valid JSON");
        ApiError::MissingText
    })?;
    let submission = Submission::from_json(&value).map_err(|_| ApiError::MissingText)?;

    info!(
        submission_id = %submission.id,
        tags = submission.selected_tags.len(),
        labels = submission.selected_labels.len(),
        "Review submission received"
    );

    let submission_id = submission.id;
    let review_text = submission.review_text.clone();
    state.fan_out.dispatch(submission);

    let result = state
        .synthesizer
        .synthesize(&review_text)
        .await
        .map_err(|e| {
            error!(submission_id = %submission_id, error = %e, "Review synthesis failed");
            ApiError::from(e)
        })?;

    Ok(Json(result))
}
