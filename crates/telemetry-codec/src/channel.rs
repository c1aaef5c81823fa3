//! Telemetry Channel Definitions
//!
//! Defines the three published channels, their wire order and fixed-point scale.

use crate::layout::{BLOCK_LEN, HEADER_LEN};
use serde::{Deserialize, Serialize};
use stats_engine::Statistics;
use std::fmt;

/// Published sensor channels, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Channel {
    /// Temperature in °C (block 0)
    Temperature = 0,
    /// Relative humidity in % (block 1)
    Humidity = 1,
    /// CO₂ concentration in ppm (block 2)
    Co2 = 2,
}

impl Channel {
    /// All channels in wire order
    pub const ALL: [Channel; 3] = [Channel::Temperature, Channel::Humidity, Channel::Co2];

    /// Block index inside the frame
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Fixed-point multiplier applied before truncation to u16
    pub fn scale(&self) -> f64 {
        match self {
            Channel::Temperature | Channel::Humidity => 100.0,
            Channel::Co2 => 1.0,
        }
    }

    /// Byte offset of this channel's block
    pub fn offset(&self) -> usize {
        HEADER_LEN + self.index() * BLOCK_LEN
    }

    /// Lowercase channel name
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::Co2 => "co2",
        }
    }

    /// Display unit
    pub fn unit(&self) -> &'static str {
        match self {
            Channel::Temperature => "°C",
            Channel::Humidity => "%",
            Channel::Co2 => "ppm",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four statistics carried per channel, in wire field order
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    /// Standard deviation (bytes 0-1 of the block)
    pub std_dev: f64,
    /// Maximum (bytes 2-3)
    pub max: f64,
    /// Minimum (bytes 4-5)
    pub min: f64,
    /// Median (bytes 6-7)
    pub median: f64,
}

impl ChannelStats {
    /// Field names paired with values, in wire order
    pub fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("std_dev", self.std_dev),
            ("max", self.max),
            ("min", self.min),
            ("median", self.median),
        ]
    }
}

impl From<&Statistics> for ChannelStats {
    fn from(stats: &Statistics) -> Self {
        Self {
            std_dev: stats.std_dev,
            max: stats.max,
            min: stats.min,
            median: stats.median,
        }
    }
}

impl From<Statistics> for ChannelStats {
    fn from(stats: Statistics) -> Self {
        Self::from(&stats)
    }
}
