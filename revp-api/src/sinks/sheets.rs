//! Google Sheets append sink
//!
//! Appends one `[timestamp, tag]` row per selected tag through the Sheets
//! `values:append` API, keyed by API key, spreadsheet id and sheet name.

use async_trait::async_trait;
use revp_common::config::SheetsConfig;
use revp_common::{RecordedAt, Submission};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{check_status, Delivery, Sink, SinkError};

/// `values:append` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendRequest {
    pub major_dimension: &'static str,
    pub values: Vec<[String; 2]>,
}

impl AppendRequest {
    /// One row per tag, all sharing the same timestamp
    pub fn rows(submission: &Submission, recorded_at: &RecordedAt) -> Self {
        let timestamp = recorded_at.timestamp();
        Self {
            major_dimension: "ROWS",
            values: submission
                .selected_tags
                .iter()
                .map(|tag| [timestamp.clone(), tag.clone()])
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: Option<String>,
}

/// Appends selected tags to a spreadsheet
pub struct SheetsSink {
    config: Option<SheetsConfig>,
    client: reqwest::Client,
}

impl SheetsSink {
    pub fn new(config: Option<SheetsConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Append URL without the query string
    pub fn append_url(config: &SheetsConfig) -> Result<reqwest::Url, SinkError> {
        let mut url = reqwest::Url::parse(&config.base_url)
            .map_err(|e| SinkError::Encode(format!("invalid sheets base url: {}", e)))?;
        let range = format!("{}!A1:append", config.sheet_name);
        url.path_segments_mut()
            .map_err(|_| SinkError::Encode("sheets base url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                config.spreadsheet_id.as_str(),
                "values",
                range.as_str(),
            ]);
        Ok(url)
    }
}

#[async_trait]
impl Sink for SheetsSink {
    fn name(&self) -> &'static str {
        "google_sheets"
    }

    fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    async fn deliver(
        &self,
        submission: &Submission,
        recorded_at: &RecordedAt,
    ) -> Result<Delivery, SinkError> {
        let Some(config) = self.config.as_ref() else {
            return Ok(Delivery::Skipped("sheets not configured"));
        };
        if submission.selected_tags.is_empty() {
            return Ok(Delivery::Skipped("no selected tags"));
        }

        let url = Self::append_url(config)?;
        let body = AppendRequest::rows(submission, recorded_at);
        debug!(
            submission_id = %submission.id,
            rows = body.values.len(),
            "Appending rows to Google Sheet"
        );

        let response = self
            .client
            .post(url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("key", config.api_key.as_str()),
            ])
            .json(&body)
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;
        let response = check_status(response).await?;

        // Response body is informational only
        if let Ok(parsed) = response.json::<AppendResponse>().await {
            if let Some(range) = parsed.updates.and_then(|u| u.updated_range) {
                info!(submission_id = %submission.id, range = %range, "Rows appended to Google Sheet");
            }
        }

        Ok(Delivery::Delivered)
    }
}
