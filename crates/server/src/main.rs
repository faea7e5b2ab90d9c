//! Service entry point
//!
//! Loads configuration and the model artifact before the listener binds;
//! a missing or unreadable artifact keeps the process from serving.

use agroyield_pipeline::ModelArtifact;
use agroyield_server::{start_server, AppState, ServerConfig};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("starting AgroYield prediction service v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::load().context("failed to load configuration")?;

    let artifact = ModelArtifact::load(&config.artifact_path).with_context(|| {
        format!(
            "failed to load model artifact from {}",
            config.artifact_path.display()
        )
    })?;

    let state = AppState::new(Arc::new(artifact));
    start_server(state, &config.listen_addr).await
}

fn init_logging() {
    let default_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
