//! Sample sources
//!
//! The hardware transport and sensor register decoding are external; the
//! pipeline only sees [`SampleSource`]. [`SimulatedSource`] stands in for the
//! real sensors.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use telemetry_codec::Channel;
use thiserror::Error;
use tracing::debug;

/// Errors reading a sample
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Transient bus or sensor failure; the cycle should be skipped
    #[error("{channel} sensor read failed: {reason}")]
    ReadFailed { channel: Channel, reason: String },

    /// Sensor did not answer at all
    #[error("{0} sensor not responding")]
    NotResponding(Channel),
}

/// Producer of scalar readings for one channel
pub trait SampleSource {
    /// Read one sample. Failures are transient: callers skip the cycle and retry
    /// on the next period.
    fn read(&mut self) -> Result<f64, SourceError>;
}

/// Deterministic pseudo-random sensor
///
/// Ranges follow the bench setup the pipeline was tuned on: temperature
/// 25-35 °C, humidity 40-70 %, CO₂ 400-600 ppm.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    channel: Channel,
    seed: u64,
    tick: u64,
    failure_rate: f64,
}

impl SimulatedSource {
    /// Create a simulated sensor for a channel
    pub fn new(channel: Channel, seed: u64) -> Self {
        Self {
            channel,
            seed,
            tick: 0,
            failure_rate: 0.0,
        }
    }

    /// Make a fraction of reads fail transiently
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    fn draw(&self, stream: u8) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        self.channel.hash(&mut hasher);
        self.tick.hash(&mut hasher);
        stream.hash(&mut hasher);
        hasher.finish()
    }
}

impl SampleSource for SimulatedSource {
    fn read(&mut self) -> Result<f64, SourceError> {
        self.tick += 1;

        let roll = (self.draw(0) % 10_000) as f64 / 10_000.0;
        if roll < self.failure_rate {
            return Err(SourceError::ReadFailed {
                channel: self.channel,
                reason: format!("simulated bus error on tick {}", self.tick),
            });
        }

        let hash = self.draw(1);
        let value = match self.channel {
            Channel::Temperature => 25.0 + (hash % 100) as f64 / 10.0,
            Channel::Humidity => 40.0 + (hash % 300) as f64 / 10.0,
            Channel::Co2 => 400.0 + (hash % 200) as f64,
        };
        debug!("{} read {:.2} {}", self.channel, value, self.channel.unit());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        for channel in Channel::ALL {
            let mut source = SimulatedSource::new(channel, 7);
            for _ in 0..200 {
                let value = source.read().unwrap();
                let (lo, hi) = match channel {
                    Channel::Temperature => (25.0, 35.0),
                    Channel::Humidity => (40.0, 70.0),
                    Channel::Co2 => (400.0, 600.0),
                };
                assert!(value >= lo && value < hi, "{channel} value {value}");
            }
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let mut a = SimulatedSource::new(Channel::Co2, 42);
        let mut b = SimulatedSource::new(Channel::Co2, 42);
        for _ in 0..20 {
            assert_eq!(a.read(), b.read());
        }
    }

    #[test]
    fn test_always_failing() {
        let mut source = SimulatedSource::new(Channel::Humidity, 1).with_failure_rate(1.0);
        assert!(matches!(
            source.read(),
            Err(SourceError::ReadFailed {
                channel: Channel::Humidity,
                ..
            })
        ));
    }
}
