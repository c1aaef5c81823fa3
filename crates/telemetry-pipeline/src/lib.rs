//! Environmental Telemetry Pipeline
//!
//! Samples temperature, humidity and CO₂, smooths and summarises them over a
//! rolling window, and publishes the summary as a 27-byte advertising frame.
//! Also hosts the bounded producer/consumer queue demo.

pub mod clock;
pub mod config;
pub mod demo;
pub mod pipeline;
pub mod sink;
pub mod source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, DemoConfig, LogFormat, LoggingConfig, PipelineConfig};
pub use demo::{run_demo, DemoReport};
pub use pipeline::{BoxedSource, CycleOutcome, Pipeline, PipelineCounters, SkipReason};
pub use sink::{FileSink, FrameSink, MemorySink, SinkError};
pub use source::{SampleSource, SimulatedSource, SourceError};

use std::str::FromStr;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Errors building a pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Window buffer could not be created
    #[error("Invalid window buffer: {0}")]
    Buffer(#[from] ring_buffer::BufferError),

    /// Median filter could not be created
    #[error("Invalid median filter: {0}")]
    Filter(#[from] data_validator::ValidationError),
}

/// Initialize logging
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = Level::from_str(&config.level).unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    match config.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    }
}
