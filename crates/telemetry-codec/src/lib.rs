//! Telemetry Frame Codec
//!
//! Serializes the per-channel statistics of the temperature, humidity and CO₂
//! channels into a fixed 27-byte little-endian frame, and decodes it again on
//! the receiving side. The frame carries no version field; both ends must
//! agree on [`layout`] out of band.

mod channel;
mod error;
mod frame;

pub use channel::{Channel, ChannelStats};
pub use error::CodecError;
pub use frame::{
    decode_frame, DecodedFrame, OverflowPolicy, SequenceCounter, TelemetryEncoder, TelemetryFrame,
};

/// Frame layout constants
pub mod layout {
    /// Total frame size in bytes
    pub const FRAME_LEN: usize = 27;
    /// Offset of the rolling sequence counter
    pub const SEQUENCE_OFFSET: usize = 0;
    /// Offset of the 16-bit truncated Unix timestamp
    pub const TIMESTAMP_OFFSET: usize = 1;
    /// Size of the header (sequence + timestamp)
    pub const HEADER_LEN: usize = 3;
    /// Bytes per channel block (std, max, min, median × 2 bytes)
    pub const BLOCK_LEN: usize = 8;
    /// Number of channel blocks
    pub const CHANNEL_COUNT: usize = 3;
}
