//! revp-api library interface
//!
//! Exposes the router, state and service components for the binary and for
//! integration testing.

pub mod api;
pub mod dispatch;
pub mod error;
pub mod sinks;
pub mod synthesis;

pub use crate::dispatch::FanOut;
pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::synthesis::ReviewSynthesizer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Generative text service
    pub synthesizer: Arc<dyn ReviewSynthesizer>,
    /// Background delivery to recording sinks
    pub fan_out: FanOut,
}

impl AppState {
    pub fn new(synthesizer: Arc<dyn ReviewSynthesizer>, fan_out: FanOut) -> Self {
        Self {
            synthesizer,
            fan_out,
        }
    }
}

/// Build application router
///
/// Unknown paths and unsupported methods on known paths both answer 404.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::liveness).fallback(api::not_found))
        .route(
            "/api/polish-review",
            post(api::polish_review).fallback(api::not_found),
        )
        .fallback(api::not_found)
        .with_state(state)
        .layer(middleware::from_fn(api::preflight))
        .layer(api::cors::allow_any_origin())
        .layer(TraceLayer::new_for_http())
}
