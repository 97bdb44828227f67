//! HTTP API for revp-api
//!
//! Routes:
//! - `OPTIONS *` - CORS preflight
//! - `POST /api/polish-review` - polish review tags, fan out to sinks
//! - `GET /` - liveness string
//! - anything else - 404

pub mod cors;
pub mod polish;
pub mod root;

pub use cors::preflight;
pub use polish::polish_review;
pub use root::{liveness, not_found, LIVENESS_MESSAGE};
