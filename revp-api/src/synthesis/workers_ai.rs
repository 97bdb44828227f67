//! Cloudflare Workers AI client
//!
//! Calls the Workers AI REST endpoint
//! `{base}/accounts/{account}/ai/run/{model}` with a bearer token. The REST
//! API wraps model output in a `{ result, success, errors, messages }`
//! envelope; the `result` object is what gets relayed to the caller.

use async_trait::async_trait;
use revp_common::config::SynthesisConfig;
use std::time::Duration;
use tracing::{debug, info};

use super::prompt::build_request;
use super::{ReviewSynthesizer, SynthesisError};

const USER_AGENT: &str = concat!("revp-api/", env!("CARGO_PKG_VERSION"));

/// Workers AI REST client
pub struct WorkersAiClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_token: String,
}

impl WorkersAiClient {
    /// Create a client with a bounded per-request timeout
    pub fn new(config: &SynthesisConfig, timeout: Duration) -> Result<Self, SynthesisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!(
                "{}/accounts/{}/ai/run/{}",
                config.base_url, config.account_id, config.model
            ),
            api_token: config.api_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Strip the REST envelope, if present
///
/// `success: false` counts as a rejection even on a 2xx status.
pub fn unwrap_envelope(body: serde_json::Value) -> Result<serde_json::Value, SynthesisError> {
    if body.get("success").and_then(|v| v.as_bool()) == Some(false) {
        let errors = body
            .get("errors")
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(SynthesisError::Rejected(errors));
    }

    match body {
        serde_json::Value::Object(mut map) if map.contains_key("result") => {
            Ok(map.remove("result").unwrap_or(serde_json::Value::Null))
        }
        other => Ok(other),
    }
}

#[async_trait]
impl ReviewSynthesizer for WorkersAiClient {
    async fn synthesize(&self, review_text: &str) -> Result<serde_json::Value, SynthesisError> {
        let request = build_request(review_text);

        debug!(
            endpoint = %self.endpoint,
            max_tokens = request.max_tokens,
            "Requesting review synthesis"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Status(status.as_u16(), error_text));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SynthesisError::Parse(e.to_string()))?;

        let result = unwrap_envelope(body)?;
        info!("Review synthesis completed");
        Ok(result)
    }
}
