//! Parse failures for a single hypothesis
//!
//! These never leave the decoder: [`crate::FrameDecoder`] turns them into `None`.

use crate::types::FrameType;
use thiserror::Error;

/// Why a buffer did not parse under one (encoding, framing) hypothesis
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// A field extends past the end of the buffer
    #[error("truncated frame: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// Frame type code is reserved or unknown
    #[error("unsupported frame type 0x{0:x}")]
    UnsupportedType(u8),

    /// Stream id is negative on the wire
    #[error("negative stream id {0}")]
    NegativeStreamId(i32),

    /// Stream id violates the rule for this frame type
    #[error("invalid stream id {stream_id} for {frame_type:?}")]
    InvalidStreamId { frame_type: FrameType, stream_id: u32 },

    /// A numeric field is out of range
    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: i64 },

    /// A text field is not valid UTF-8
    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    /// Bytes remain after a fixed-layout frame
    #[error("{0} trailing bytes after frame")]
    TrailingBytes(usize),

    /// Length prefix disagrees with the buffer size
    #[error("length prefix {declared} does not match frame size {actual}")]
    LengthMismatch { declared: usize, actual: usize },
}

/// Result type for single-hypothesis parsing
pub type Result<T> = std::result::Result<T, FrameError>;
