//! Walls user service entry point.

use anyhow::{Context, Result};
use tracing::info;

use service_runtime::{ServiceConfig, ServiceRuntime};
use walls_telemetry::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from_env();
    init_logging(&config.telemetry).context("failed to initialize logging")?;
    config.validate().context("invalid service configuration")?;

    let mut runtime = ServiceRuntime::new(config);
    runtime.start();

    info!("Service is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    runtime.shutdown().await;
    Ok(())
}
