//! Generic JSON webhook sink

use async_trait::async_trait;
use revp_common::{RecordedAt, Submission};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::{check_status, Delivery, Sink, SinkError};

/// JSON body posted to webhooks
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload<'a> {
    pub submission_id: Uuid,
    pub timestamp: String,
    pub review_text: &'a str,
    pub selected_tags: &'a [String],
    pub selected_labels: &'a [String],
}

impl<'a> WebhookPayload<'a> {
    pub fn new(submission: &'a Submission, recorded_at: &RecordedAt) -> Self {
        Self {
            submission_id: submission.id,
            timestamp: recorded_at.timestamp(),
            review_text: &submission.review_text,
            selected_tags: &submission.selected_tags,
            selected_labels: &submission.selected_labels,
        }
    }
}

/// Posts the submission as JSON to a webhook URL
pub struct WebhookSink {
    name: &'static str,
    url: Option<String>,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn primary(url: Option<String>, client: reqwest::Client) -> Self {
        Self {
            name: "webhook",
            url,
            client,
        }
    }

    pub fn backup(url: Option<String>, client: reqwest::Client) -> Self {
        Self {
            name: "backup_webhook",
            url,
            client,
        }
    }
}

#[async_trait]
impl Sink for WebhookSink {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    async fn deliver(
        &self,
        submission: &Submission,
        recorded_at: &RecordedAt,
    ) -> Result<Delivery, SinkError> {
        let Some(url) = self.url.as_deref() else {
            return Ok(Delivery::Skipped("url not configured"));
        };

        let payload = WebhookPayload::new(submission, recorded_at);
        debug!(sink = self.name, submission_id = %submission.id, "Posting webhook payload");

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;
        check_status(response).await?;

        Ok(Delivery::Delivered)
    }
}
