//! Scripted synthesizer for tests and local runs

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{ReviewSynthesizer, SynthesisError};

/// Returns a fixed response (or failure) after an optional delay
pub struct MockSynthesizer {
    response: Result<serde_json::Value, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockSynthesizer {
    /// Always answer `{ "response": text }`
    pub fn responding(text: &str) -> Self {
        Self {
            response: Ok(serde_json::json!({ "response": text })),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with a network error carrying `message`
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Wait `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of synthesize calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewSynthesizer for MockSynthesizer {
    async fn synthesize(&self, _review_text: &str) -> Result<serde_json::Value, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone().map_err(SynthesisError::Network)
    }
}
