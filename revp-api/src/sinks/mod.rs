//! Recording sinks
//!
//! Each sink delivers one submission to one external system. Deliveries are
//! best-effort: every failure comes back as a `SinkError` for the fan-out
//! coordinator to log, and a sink without configuration skips quietly.
//!
//! # Sinks
//! 1. **webhook** - JSON POST to the primary webhook
//! 2. **backup_webhook** - same payload to the backup webhook
//! 3. **google_sheets** - one `[timestamp, tag]` row per selected tag
//! 4. **google_form** - URL-encoded form with categorized labels

pub mod form;
pub mod sheets;
pub mod webhook;

use async_trait::async_trait;
use revp_common::config::SinkConfig;
use revp_common::{RecordedAt, Submission};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use form::{FormSink, LIST_SEPARATOR};
pub use sheets::SheetsSink;
pub use webhook::WebhookSink;

const USER_AGENT: &str = concat!("revp-api/", env!("CARGO_PKG_VERSION"));

/// Sink delivery failures; logged, never surfaced to the caller
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Endpoint returned {0}: {1}")]
    Status(u16, String),

    #[error("Encode error: {0}")]
    Encode(String),
}

/// Outcome of a delivery that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Skipped(&'static str),
}

/// A recording sink
#[async_trait]
pub trait Sink: Send + Sync {
    /// Sink identifier for logs (e.g., "webhook", "google_form")
    fn name(&self) -> &'static str;

    /// Whether the sink has the configuration it needs
    fn is_configured(&self) -> bool;

    /// Deliver one submission
    ///
    /// # Returns
    /// * `Ok(Delivery::Skipped(_))` - sink not configured or nothing to record
    /// * `Ok(Delivery::Delivered)` - endpoint accepted the payload
    /// * `Err(_)` - delivery failed (logged by the caller, not retried)
    async fn deliver(
        &self,
        submission: &Submission,
        recorded_at: &RecordedAt,
    ) -> Result<Delivery, SinkError>;
}

/// HTTP client shared by all sinks, with a bounded per-request timeout
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, SinkError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| SinkError::Network(e.to_string()))
}

/// Build every sink from configuration
///
/// Unconfigured sinks are still included and skip on delivery.
pub fn build_sinks(config: &SinkConfig, client: reqwest::Client) -> Vec<Arc<dyn Sink>> {
    vec![
        Arc::new(WebhookSink::primary(config.webhook_url.clone(), client.clone())),
        Arc::new(WebhookSink::backup(
            config.backup_webhook_url.clone(),
            client.clone(),
        )),
        Arc::new(SheetsSink::new(config.sheets.clone(), client.clone())),
        Arc::new(FormSink::new(config.form.clone(), client)),
    ]
}

/// Turn a non-success response into `SinkError::Status`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SinkError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(SinkError::Status(status.as_u16(), body))
    }
}
