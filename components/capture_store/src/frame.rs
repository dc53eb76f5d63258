//! Captured frames

use base64::Engine as _;
use capture_types::{Direction, FrameId, WebSocketFrame, WebSocketOpcode};
use frame_decoder::DecodedFrame;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Application payload of a frame, chosen by opcode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FrameContent {
    /// Opcode 1: the transport's payload text
    Text(String),
    /// Opcode 2: the base64-decoded payload bytes
    Binary(Vec<u8>),
}

/// One captured WebSocket message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub id: FrameId,
    pub direction: Direction,
    /// Capture time in ms since the Unix epoch
    pub time: f64,
    /// Byte length of the text or binary content
    pub length: usize,
    /// Payload exactly as delivered by the transport
    pub payload: String,
    pub content: FrameContent,
}

impl Frame {
    /// Build a frame from a transport message
    ///
    /// Returns `None` for opcodes that do not carry data (close, ping, ...).
    pub fn from_message(
        id: FrameId,
        direction: Direction,
        time: f64,
        message: WebSocketFrame,
    ) -> Option<Self> {
        let content = match message.opcode {
            WebSocketOpcode::Text => FrameContent::Text(message.payload_data.clone()),
            WebSocketOpcode::Binary => FrameContent::Binary(decode_base64(&message.payload_data)),
            _ => return None,
        };
        let length = match &content {
            FrameContent::Text(text) => text.len(),
            FrameContent::Binary(bytes) => bytes.len(),
        };

        Some(Self {
            id,
            direction,
            time,
            length,
            payload: message.payload_data,
            content,
        })
    }

    /// Text content, for text frames
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            FrameContent::Text(text) => Some(text),
            FrameContent::Binary(_) => None,
        }
    }

    /// Binary content, for binary frames
    pub fn binary(&self) -> Option<&[u8]> {
        match &self.content {
            FrameContent::Binary(bytes) => Some(bytes),
            FrameContent::Text(_) => None,
        }
    }

    /// Bytes handed to the frame decoder
    ///
    /// The raw payload is always read as base64, so a plain text frame yields no
    /// bytes and is not decodable.
    pub fn raw_bytes(&self) -> Cow<'_, [u8]> {
        match &self.content {
            FrameContent::Binary(bytes) => Cow::Borrowed(bytes),
            FrameContent::Text(_) => Cow::Owned(decode_base64(&self.payload)),
        }
    }

    /// Text stored in the search index: decoded data, then text content, then raw payload
    pub fn indexed_text<'a>(&'a self, decoded: Option<&'a DecodedFrame>) -> Cow<'a, str> {
        if let Some(data) = decoded.and_then(DecodedFrame::data_text) {
            return data;
        }
        match self.text() {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Borrowed(&self.payload),
        }
    }
}

/// List-row view of a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSummary {
    pub id: FrameId,
    pub direction: Direction,
    pub time: f64,
    /// Decoded short name, or "Text Frame" / "Binary Frame"
    pub label: String,
    pub length: usize,
}

impl FrameSummary {
    pub fn new(frame: &Frame, decoded: Option<&DecodedFrame>) -> Self {
        let label = match decoded {
            Some(decoded) => decoded.short_name(),
            None => match frame.content {
                FrameContent::Text(_) => "Text Frame".to_string(),
                FrameContent::Binary(_) => "Binary Frame".to_string(),
            },
        };
        Self {
            id: frame.id,
            direction: frame.direction,
            time: frame.time,
            label,
            length: frame.length,
        }
    }
}

/// Standard base64; invalid input decodes to nothing
fn decode_base64(data: &str) -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .unwrap_or_default()
}
