//! Bounded queue producer/consumer demo

use anyhow::Context;
use clap::{Parser, ValueEnum};
use ring_buffer::QueuePolicy;
use std::path::PathBuf;
use telemetry_pipeline::{init_logging, run_demo, PipelineConfig};
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Producer waits for space
    Block,
    /// Newest sample is discarded when full
    Drop,
}

impl From<PolicyArg> for QueuePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Block => QueuePolicy::Block,
            PolicyArg::Drop => QueuePolicy::DropNewest,
        }
    }
}

/// Run a fast producer against a slow consumer over a bounded queue
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Full-queue policy
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Number of samples to produce
    #[arg(short = 'n', long)]
    items: Option<u64>,

    /// Queue capacity
    #[arg(long)]
    capacity: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = PipelineConfig::load(args.config.as_deref())?;
    init_logging(&config.logging).context("failed to install log subscriber")?;

    let mut demo = config.demo;
    if let Some(policy) = args.policy {
        demo.policy = policy.into();
    }
    if let Some(items) = args.items {
        demo.items = items;
    }
    if let Some(capacity) = args.capacity {
        demo.queue_capacity = capacity;
    }

    let report = run_demo(&demo, config.simulation.seed)?;
    info!("Report: {}", serde_json::to_string(&report)?);
    Ok(())
}
