//! revp-api - Review Polisher service
//!
//! Accepts restaurant-review tags, asks the generative text service for a
//! polished review, and records each submission to the configured sinks in
//! the background.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use revp_common::config::ServiceConfig;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revp_api::sinks::{build_sinks, http_client};
use revp_api::synthesis::WorkersAiClient;
use revp_api::{build_router, AppState, FanOut};

/// Command-line arguments for revp-api
#[derive(Parser, Debug)]
#[command(name = "revp-api")]
#[command(about = "Review polishing service with background submission recording")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "REVP_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8787", env = "REVP_PORT")]
    port: u16,

    /// Timeout for each sink delivery, in seconds
    #[arg(long, default_value = "30", env = "REVP_OUTBOUND_TIMEOUT_SECS")]
    outbound_timeout_secs: u64,

    /// Timeout for the synthesis call, in seconds
    #[arg(long, default_value = "60", env = "REVP_SYNTHESIS_TIMEOUT_SECS")]
    synthesis_timeout_secs: u64,

    /// How long shutdown waits for in-flight sink deliveries, in seconds
    #[arg(long, default_value = "10", env = "REVP_SHUTDOWN_GRACE_SECS")]
    shutdown_grace_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revp_api=info,revp_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification before anything that can fail
    info!(
        "Starting Review Polisher (revp-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = ServiceConfig::from_env().context("Failed to load configuration")?;
    info!(model = %config.synthesis.model, "Synthesis service configured");
    config.sinks.log_summary();

    let synthesizer = WorkersAiClient::new(
        &config.synthesis,
        Duration::from_secs(args.synthesis_timeout_secs),
    )
    .context("Failed to build synthesis client")?;

    let sink_client = http_client(Duration::from_secs(args.outbound_timeout_secs))
        .context("Failed to build sink HTTP client")?;
    let fan_out = FanOut::new(build_sinks(&config.sinks, sink_client));

    let state = AppState::new(Arc::new(synthesizer), fan_out.clone());
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Background deliveries outlive their responses; give them time to land
    fan_out
        .shutdown(Duration::from_secs(args.shutdown_grace_secs))
        .await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
