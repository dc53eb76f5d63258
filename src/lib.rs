//! Inspector for RSocket traffic captured from WebSocket connections
//!
//! Records the WebSocket frames a debugging transport reports, decodes them as
//! RSocket frames without knowing how the stream was configured, and keeps a
//! per-connection full-text index for search.
//!
//! # Example
//!
//! ```
//! use ws_frame_inspector::{Inspector, InspectorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let inspector = Inspector::new(InspectorConfig::default())?;
//!
//!     // stream 1, PAYLOAD with NEXT, data "hi", sent as base64
//!     inspector
//!         .ingest_json(r#"{"method":"Network.webSocketFrameReceived","params":{
//!             "requestId":"1","timestamp":0.5,
//!             "response":{"opcode":2,"payloadData":"AAAAASggaGk="}}}"#)
//!         .await?;
//!
//!     let frame = &inspector.frames_of("1")[0];
//!     let decoded = inspector.decode(frame).expect("an RSocket frame");
//!     assert_eq!(decoded.short_name(), "PAYLOAD [NEXT]");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub use capture_store::{
    ChangeSet, Command, ConnectionInfo, Frame, FrameContent, FrameSummary, StoreChange,
};
pub use capture_types::{CaptureError, CdpEvent, Direction, FrameId, RequestId, Timestamp};
pub use frame_decoder::{
    parse_structured, DecodedFrame, DecoderStats, Encoding, FrameFields, FrameType, Framing,
    Hypothesis, Payload,
};
pub use inspector_component::{
    Inspector, InspectorConfig, InspectorConfigBuilder, InspectorError, Result,
};
