//! Fixed-Capacity Ring Buffers
//!
//! Two disciplines over the same circular storage:
//!
//! - [`RingBuffer`]: overwrite-oldest snapshot window for a single owner
//! - [`SynchronizedQueue`]: bounded FIFO handoff between producer and consumer
//!   threads, either blocking or dropping new items when full

mod buffer;
mod error;
mod fifo;
mod queue;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};
pub use error::BufferError;
pub use fifo::FifoBuffer;
pub use queue::{PushOutcome, QueuePolicy, SynchronizedQueue};

use serde::{Deserialize, Serialize};

/// One combined environmental reading, as handed between threads by the queue demo
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// CO₂ concentration (ppm)
    pub co2: f64,
    /// Capture time (Unix seconds)
    pub timestamp: i64,
}
