//! Buffer Error Types

use thiserror::Error;

/// Errors raised when constructing a buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// A buffer needs at least one slot
    #[error("Buffer capacity must be greater than zero")]
    ZeroCapacity,
}
