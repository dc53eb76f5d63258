//! RSocket frame decoding for captured WebSocket traffic
//!
//! Captured payloads carry no signal about how an RSocket stream was configured:
//! data/metadata may be UTF-8 text or raw bytes, and frames may or may not carry a
//! 24-bit length prefix. [`FrameDecoder`] tries the four combinations in a fixed
//! order and remembers the last one that worked, so a session that uses a single
//! configuration decodes every frame on the first attempt.
//!
//! # Example
//!
//! ```
//! use frame_decoder::{FrameDecoder, FrameType};
//!
//! // stream 1, PAYLOAD with NEXT | COMPLETE, data "hi"
//! let bytes = [0, 0, 0, 1, 0x28, 0x60, b'h', b'i'];
//!
//! let mut decoder = FrameDecoder::new();
//! let frame = decoder.decode(&bytes).unwrap();
//! assert_eq!(frame.frame_type, FrameType::Payload);
//! assert_eq!(frame.short_name(), "PAYLOAD [COMPLETE, LEASE, NEXT]");
//!
//! assert!(decoder.decode(b"not a frame").is_none());
//! ```

pub mod codec;
pub mod decoder;
pub mod error;
pub mod frame;
mod reader;
pub mod structured;
pub mod types;

pub use codec::{deserialize_frame, deserialize_frame_with_length, Encoding, Framing, Hypothesis};
pub use decoder::{DecoderStats, FrameDecoder, FALLBACK_ORDER};
pub use error::FrameError;
pub use frame::{DecodedFrame, FrameFields, Payload};
pub use structured::parse_structured;
pub use types::{flags, frame_type_name, FrameType};
