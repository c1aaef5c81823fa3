//! Telemetry Frame Encoding and Decoding

use crate::channel::{Channel, ChannelStats};
use crate::error::CodecError;
use crate::layout::{CHANNEL_COUNT, FRAME_LEN, SEQUENCE_OFFSET, TIMESTAMP_OFFSET};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Handling of scaled values that do not fit an unsigned 16-bit field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the low 16 bits of the rounded integer (-5.00 °C encodes as 65036)
    #[default]
    Wrap,
    /// Clamp into 0..=65535
    Saturate,
    /// Refuse to encode the frame
    Reject,
}

/// Rolling one-byte frame counter, owned by the encoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceCounter {
    next: u8,
}

impl SequenceCounter {
    /// Counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter starting at an arbitrary value
    pub fn starting_at(next: u8) -> Self {
        Self { next }
    }

    /// Value the next frame will carry
    pub fn current(&self) -> u8 {
        self.next
    }

    /// Take the current value and advance, wrapping after 255
    pub fn advance(&mut self) -> u8 {
        let value = self.next;
        self.next = self.next.wrapping_add(1);
        value
    }
}

/// One encoded 27-byte frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame([u8; FRAME_LEN]);

impl TelemetryFrame {
    /// Raw frame bytes
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Consume into raw bytes
    pub fn into_bytes(self) -> [u8; FRAME_LEN] {
        self.0
    }

    /// Sequence counter byte
    pub fn sequence(&self) -> u8 {
        self.0[SEQUENCE_OFFSET]
    }

    /// Truncated timestamp
    pub fn timestamp(&self) -> u16 {
        read_u16(&self.0, TIMESTAMP_OFFSET)
    }
}

impl AsRef<[u8]> for TelemetryFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Encoder holding the frame sequence state
#[derive(Debug, Clone, Default)]
pub struct TelemetryEncoder {
    counter: SequenceCounter,
    policy: OverflowPolicy,
}

impl TelemetryEncoder {
    /// Create an encoder with a fresh counter
    pub fn new(policy: OverflowPolicy) -> Self {
        Self::with_counter(SequenceCounter::new(), policy)
    }

    /// Create an encoder resuming from an existing counter
    pub fn with_counter(counter: SequenceCounter, policy: OverflowPolicy) -> Self {
        Self { counter, policy }
    }

    /// Encode one frame.
    ///
    /// `now` is Unix time in seconds; only its low 16 bits are sent. The
    /// sequence counter advances only when a frame is produced.
    pub fn encode(
        &mut self,
        now: u64,
        channels: &[ChannelStats; CHANNEL_COUNT],
    ) -> Result<TelemetryFrame, CodecError> {
        let mut bytes = [0u8; FRAME_LEN];

        for (channel, stats) in Channel::ALL.iter().zip(channels.iter()) {
            let mut offset = channel.offset();
            for (field, value) in stats.fields() {
                let fixed = self.scale_field(*channel, field, value)?;
                bytes[offset..offset + 2].copy_from_slice(&fixed.to_le_bytes());
                offset += 2;
            }
        }

        let timestamp = (now % 65_536) as u16;
        bytes[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 2].copy_from_slice(&timestamp.to_le_bytes());
        bytes[SEQUENCE_OFFSET] = self.counter.advance();

        debug!("Encoded frame seq={} ts={}", bytes[SEQUENCE_OFFSET], timestamp);
        Ok(TelemetryFrame(bytes))
    }

    /// Sequence state
    pub fn counter(&self) -> SequenceCounter {
        self.counter
    }

    fn scale_field(&self, channel: Channel, field: &'static str, value: f64) -> Result<u16, CodecError> {
        let scaled = (value * channel.scale()).round();
        if (0.0..=f64::from(u16::MAX)).contains(&scaled) {
            return Ok(scaled as u16);
        }

        warn!(
            "{} {} = {} does not fit a u16 field after scaling ({}), policy {:?}",
            channel, field, value, scaled, self.policy
        );
        match self.policy {
            OverflowPolicy::Wrap => Ok(scaled as i64 as u16),
            OverflowPolicy::Saturate => Ok(scaled as u16),
            OverflowPolicy::Reject => Err(CodecError::OutOfRange {
                channel,
                field,
                value,
                scaled,
            }),
        }
    }
}

/// A frame decoded back into engineering units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodedFrame {
    /// Rolling sequence counter
    pub sequence: u8,
    /// Unix time modulo 65536
    pub timestamp: u16,
    /// Per-channel statistics, in wire order
    pub channels: [ChannelStats; CHANNEL_COUNT],
}

impl DecodedFrame {
    /// Statistics of one channel
    pub fn channel(&self, channel: Channel) -> &ChannelStats {
        &self.channels[channel.index()]
    }
}

/// Decode a 27-byte frame, dividing each field by its channel scale
pub fn decode_frame(bytes: &[u8]) -> Result<DecodedFrame, CodecError> {
    if bytes.len() != FRAME_LEN {
        return Err(CodecError::InvalidLength {
            expected: FRAME_LEN,
            actual: bytes.len(),
        });
    }

    let mut channels = [ChannelStats::default(); CHANNEL_COUNT];
    for channel in Channel::ALL {
        let base = channel.offset();
        let scale = channel.scale();
        let field = |i: usize| f64::from(read_u16(bytes, base + 2 * i)) / scale;
        channels[channel.index()] = ChannelStats {
            std_dev: field(0),
            max: field(1),
            min: field(2),
            median: field(3),
        };
    }
    Ok(DecodedFrame {
        sequence: bytes[SEQUENCE_OFFSET],
        timestamp: read_u16(bytes, TIMESTAMP_OFFSET),
        channels,
    })
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}
