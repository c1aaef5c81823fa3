//! Frame sinks
//!
//! Only the most recent frame is kept: every write replaces the previous one
//! wholesale. The radio stack that advertises it is external.

use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use telemetry_codec::TelemetryFrame;
use thiserror::Error;
use tracing::debug;

/// Errors writing a frame
#[derive(Debug, Error)]
pub enum SinkError {
    /// Filesystem failure
    #[error("Failed to write frame to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sink refused the frame
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Consumer of encoded frames
pub trait FrameSink {
    /// Replace the published frame
    fn write(&mut self, frame: &TelemetryFrame) -> Result<(), SinkError>;
}

/// Writes the latest frame to a file.
///
/// The frame goes to a temporary file in the same directory which is then
/// renamed over the target, so readers never observe a partial frame.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl FrameSink for FileSink {
    fn write(&mut self, frame: &TelemetryFrame) -> Result<(), SinkError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(frame.as_bytes()).map_err(|e| self.io_error(e))?;
        tmp.flush().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        debug!("Frame seq={} written to {}", frame.sequence(), self.path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    latest: Option<TelemetryFrame>,
    writes: usize,
    failing: bool,
}

/// In-memory sink; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently written frame
    pub fn latest(&self) -> Option<TelemetryFrame> {
        self.state.lock().latest
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.state.lock().writes
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }
}

impl FrameSink for MemorySink {
    fn write(&mut self, frame: &TelemetryFrame) -> Result<(), SinkError> {
        let mut state = self.state.lock();
        if state.failing {
            return Err(SinkError::Unavailable("memory sink set to fail".into()));
        }
        state.latest = Some(*frame);
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemetry_codec::{ChannelStats, TelemetryEncoder};

    fn frame(seq_offset: u8) -> TelemetryFrame {
        let mut encoder = TelemetryEncoder::default();
        let stats = [ChannelStats {
            std_dev: 0.1,
            max: 2.0,
            min: 1.0,
            median: 1.5,
        }; 3];
        let mut frame = encoder.encode(0, &stats).expect("encode");
        for _ in 0..seq_offset {
            frame = encoder.encode(0, &stats).expect("encode");
        }
        frame
    }

    #[test]
    fn test_file_sink_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("payload.bin");
        let mut sink = FileSink::new(&path);

        sink.write(&frame(0)).expect("first write");
        sink.write(&frame(4)).expect("second write");

        let bytes = std::fs::read(&path).expect("read back");
        assert_eq!(bytes.len(), 27);
        assert_eq!(bytes[0], 4);
    }

    #[test]
    fn test_file_sink_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = FileSink::new(dir.path().join("missing").join("payload.bin"));
        assert!(matches!(sink.write(&frame(0)), Err(SinkError::Io { .. })));
    }

    #[test]
    fn test_memory_sink_failure_toggle() {
        let handle = MemorySink::new();
        let mut sink = handle.clone();
        sink.set_failing(true);
        assert!(sink.write(&frame(0)).is_err());
        sink.set_failing(false);
        sink.write(&frame(1)).expect("write");
        assert_eq!(handle.writes(), 1);
        assert_eq!(handle.latest().map(|f| f.sequence()), Some(1));
    }
}
