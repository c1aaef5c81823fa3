//! Environmental Telemetry - Main Entry Point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use telemetry_pipeline::{init_logging, Pipeline, PipelineConfig};
use tracing::{info, warn};

/// Sample the simulated sensors and publish telemetry frames until Ctrl+C
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the frame output path
    #[arg(short, long)]
    payload: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = PipelineConfig::load(args.config.as_deref())?;
    if let Some(payload) = args.payload {
        config.payload_path = payload;
    }
    init_logging(&config.logging).context("failed to install log subscriber")?;

    info!("=== Environmental Telemetry v{} ===", env!("CARGO_PKG_VERSION"));

    let mut pipeline = Pipeline::simulated(&config)?;
    let counters = pipeline
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Ctrl+C handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutdown requested");
        })
        .await;

    info!("Final counters: {}", serde_json::to_string(&counters)?);
    Ok(())
}
