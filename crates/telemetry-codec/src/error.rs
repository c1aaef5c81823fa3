//! Codec Error Types

use crate::channel::Channel;
use thiserror::Error;

/// Errors raised while encoding or decoding a frame
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Scaled value does not fit an unsigned 16-bit field
    #[error("{channel} {field} = {value} scales to {scaled}, outside 0..=65535")]
    OutOfRange {
        channel: Channel,
        field: &'static str,
        value: f64,
        scaled: f64,
    },

    /// Input is not exactly one frame long
    #[error("Frame must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
