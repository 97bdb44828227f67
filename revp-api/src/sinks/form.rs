//! Form submission sink
//!
//! Posts a URL-encoded form whose field names are externally supplied entry
//! ids. Selected labels are sorted into the five review categories and each
//! category is sent as its own field.

use async_trait::async_trait;
use revp_common::config::{FormConfig, FormFieldIds};
use revp_common::{categorize, Category, RecordedAt, Submission};
use tracing::debug;

use super::{check_status, Delivery, Sink, SinkError};

/// Separator for list-valued form fields
pub const LIST_SEPARATOR: &str = ", ";

/// Form fields for one submission, in submission order
///
/// Fields whose entry id is not configured are omitted.
pub fn form_fields(
    ids: &FormFieldIds,
    submission: &Submission,
    recorded_at: &RecordedAt,
) -> Vec<(String, String)> {
    let buckets = categorize(submission.selected_labels.as_slice());

    let mut fields: Vec<(Option<&str>, String)> = vec![
        (ids.timestamp.as_deref(), recorded_at.timestamp()),
        (ids.date.as_deref(), recorded_at.date()),
        (ids.time.as_deref(), recorded_at.time()),
        (ids.review_text.as_deref(), submission.review_text.clone()),
        (
            ids.tags.as_deref(),
            submission.selected_tags.join(LIST_SEPARATOR),
        ),
    ];
    for category in Category::ALL {
        fields.push((
            ids.category(category),
            buckets.joined(category, LIST_SEPARATOR),
        ));
    }

    fields
        .into_iter()
        .filter_map(|(id, value)| id.map(|id| (id.to_string(), value)))
        .collect()
}

/// Submits categorized labels to a form endpoint
pub struct FormSink {
    config: Option<FormConfig>,
    client: reqwest::Client,
}

impl FormSink {
    pub fn new(config: Option<FormConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl Sink for FormSink {
    fn name(&self) -> &'static str {
        "google_form"
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
            return Ok(Delivery::Skipped("form url not configured"));
        };

        let fields = form_fields(&config.fields, submission, recorded_at);
        debug!(
            submission_id = %submission.id,
            fields = fields.len(),
            "Submitting form"
        );

        let response = self
            .client
            .post(&config.url)
            .form(&fields)
            .send()
            .await
            .map_err(|e| SinkError::Network(e.to_string()))?;
        check_status(response).await?;

        Ok(Delivery::Delivered)
    }
}
