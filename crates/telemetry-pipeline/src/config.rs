//! Pipeline configuration
//!
//! Loaded with the `config` crate: built-in defaults, then an optional TOML
//! file, then `ENV_SENSING__*` environment overrides
//! (e.g. `ENV_SENSING__MEDIAN_WINDOW=7`, `ENV_SENSING__LOGGING__LEVEL=debug`).

use data_validator::{ValidationConfig, MAX_WINDOW_SIZE};
use ring_buffer::QueuePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use telemetry_codec::{Channel, OverflowPolicy};
use thiserror::Error;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "ENV_SENSING";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File or environment could not be read/deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Simulated sensor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the deterministic sample generators
    pub seed: u64,
    /// Probability (0-1) that a read fails transiently
    pub failure_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            failure_rate: 0.0,
        }
    }
}

/// Producer/consumer demo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Queue capacity
    pub queue_capacity: usize,
    /// Full-queue policy
    pub policy: QueuePolicy,
    /// Delay between produced samples (ms)
    pub produce_interval_ms: u64,
    /// Simulated processing time per consumed sample (ms)
    pub consume_delay_ms: u64,
    /// Number of samples to produce
    pub items: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 3,
            policy: QueuePolicy::DropNewest,
            produce_interval_ms: 1_000,
            consume_delay_ms: 2_000,
            items: 20,
        }
    }
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Median filter window
    pub median_window: usize,
    /// Samples kept per channel for statistics
    pub buffer_capacity: usize,
    /// Sampling period (ms)
    pub measurement_interval_ms: u64,
    /// Publish a frame every N successful cycles
    pub publish_every: u32,
    /// Where the latest frame is written
    pub payload_path: PathBuf,
    /// Handling of values that do not fit the frame fields
    pub overflow_policy: OverflowPolicy,
    /// Channels passed through the median filter before buffering
    pub filter_channels: Vec<Channel>,
    /// Plausibility ranges
    pub validation: ValidationConfig,
    /// Simulated sensors
    pub simulation: SimulationConfig,
    /// Logging
    pub logging: LoggingConfig,
    /// Producer/consumer demo
    pub demo: DemoConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            median_window: 5,
            buffer_capacity: ring_buffer::DEFAULT_CAPACITY,
            measurement_interval_ms: 1_000,
            publish_every: 3,
            payload_path: PathBuf::from("payload.bin"),
            overflow_policy: OverflowPolicy::Wrap,
            filter_channels: vec![Channel::Temperature],
            validation: ValidationConfig::default(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load defaults, an optional TOML file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.median_window == 0 || self.median_window > MAX_WINDOW_SIZE {
            return Err(ConfigError::Invalid(format!(
                "median_window must be between 1 and {MAX_WINDOW_SIZE}, got {}",
                self.median_window
            )));
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::Invalid("buffer_capacity must be > 0".into()));
        }
        if self.measurement_interval_ms == 0 {
            return Err(ConfigError::Invalid("measurement_interval_ms must be > 0".into()));
        }
        if self.publish_every == 0 {
            return Err(ConfigError::Invalid("publish_every must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.simulation.failure_rate) {
            return Err(ConfigError::Invalid(format!(
                "simulation.failure_rate must be within 0..=1, got {}",
                self.simulation.failure_rate
            )));
        }
        if self.demo.queue_capacity == 0 {
            return Err(ConfigError::Invalid("demo.queue_capacity must be > 0".into()));
        }
        if tracing::Level::from_str(&self.logging.level).is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown logging.level {:?}",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// Sampling period
    pub fn measurement_interval(&self) -> Duration {
        Duration::from_millis(self.measurement_interval_ms)
    }
}
