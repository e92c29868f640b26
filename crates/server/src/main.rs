//! dentascan server binary

use anyhow::Context;
use dentascan_server::{serve, ServerConfig};
use llm_bridge::{Analyzer, BackendConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let backend = BackendConfig::from_env().context("Invalid backend configuration")?;
    let capability = backend.build().context("Failed to create vision model client")?;
    tracing::info!(model = backend.model(), "vision backend ready");

    serve(ServerConfig::from_env(), Analyzer::new(capability)).await
}
