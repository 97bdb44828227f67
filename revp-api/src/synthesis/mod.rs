//! Review synthesis
//!
//! Turns raw review-tag text into a polished review by calling a generative
//! text service. The completion is relayed to the caller as an opaque JSON
//! value; nothing here inspects its content.

pub mod mock;
pub mod prompt;
pub mod workers_ai;

use async_trait::async_trait;
use thiserror::Error;

pub use mock::MockSynthesizer;
pub use prompt::{build_request, ChatMessage, SynthesisRequest};
pub use workers_ai::WorkersAiClient;

/// Generative service failures
///
/// All variants surface to the caller as a 500 response.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Synthesis service returned {0}: {1}")]
    Status(u16, String),

    #[error("Synthesis service rejected the request: {0}")]
    Rejected(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Something that can polish review tags into prose
#[async_trait]
pub trait ReviewSynthesizer: Send + Sync {
    /// Request a polished review for `review_text`
    ///
    /// Returns the service's response object unchanged.
    async fn synthesize(&self, review_text: &str) -> Result<serde_json::Value, SynthesisError>;
}
