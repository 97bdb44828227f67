//! Review submission model

use serde::Serialize;
use uuid::Uuid;

use crate::{Error, Result};

/// One review submission as received from the review form
///
/// Built once per request and shared read-only between the synthesis call and
/// every sink delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Correlation id for logs and sink payloads
    pub id: Uuid,
    /// Raw review-tag text fed to the synthesis service
    pub review_text: String,
    /// Human-readable tag phrases
    pub selected_tags: Vec<String>,
    /// Canonical label identifiers used for categorization
    pub selected_labels: Vec<String>,
}

impl Submission {
    /// Create a submission with a fresh id
    ///
    /// Fails with `Error::InvalidInput` when `review_text` is empty.
    pub fn new(
        review_text: impl Into<String>,
        selected_tags: Vec<String>,
        selected_labels: Vec<String>,
    ) -> Result<Self> {
        let review_text = review_text.into();
        if review_text.is_empty() {
            return Err(Error::InvalidInput("review text is empty".to_string()));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            review_text,
            selected_tags,
            selected_labels,
        })
    }

    /// Parse a submission from a JSON request body
    ///
    /// Only `text` is validated: it must be a non-empty string. `selectedTags`
    /// and `selectedLabels` are read leniently; anything other than an array is
    /// treated as empty and non-string elements are skipped.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let text = value
            .get("text")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidInput("missing \"text\"".to_string()))?;

        Self::new(
            text,
            string_array(value.get("selectedTags")),
            string_array(value.get("selectedLabels")),
        )
    }
}

fn string_array(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
