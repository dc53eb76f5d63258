// Network domain types (WebSocket subset)

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique request identifier; for WebSockets this identifies the connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub String);

impl RequestId {
    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RequestId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic transport timestamp (seconds, arbitrary origin)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Timestamp(pub f64);

/// Direction of a captured frame relative to the inspected page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Received by the page
    Incoming,
    /// Sent by the page
    Outgoing,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Incoming => f.write_str("incoming"),
            Direction::Outgoing => f.write_str("outgoing"),
        }
    }
}

/// WebSocket frame opcode as reported by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum WebSocketOpcode {
    /// Continuation frame
    Continuation,
    /// Text frame
    Text,
    /// Binary frame
    Binary,
    /// Connection close
    Close,
    /// Ping frame
    Ping,
    /// Pong frame
    Pong,
    /// Reserved or unknown opcode
    Other(u8),
}

impl WebSocketOpcode {
    /// Whether frames with this opcode carry application data
    pub fn carries_data(self) -> bool {
        matches!(self, WebSocketOpcode::Text | WebSocketOpcode::Binary)
    }
}

impl From<u8> for WebSocketOpcode {
    fn from(value: u8) -> Self {
        match value {
            0 => WebSocketOpcode::Continuation,
            1 => WebSocketOpcode::Text,
            2 => WebSocketOpcode::Binary,
            8 => WebSocketOpcode::Close,
            9 => WebSocketOpcode::Ping,
            10 => WebSocketOpcode::Pong,
            other => WebSocketOpcode::Other(other),
        }
    }
}

impl From<WebSocketOpcode> for u8 {
    fn from(value: WebSocketOpcode) -> Self {
        match value {
            WebSocketOpcode::Continuation => 0,
            WebSocketOpcode::Text => 1,
            WebSocketOpcode::Binary => 2,
            WebSocketOpcode::Close => 8,
            WebSocketOpcode::Ping => 9,
            WebSocketOpcode::Pong => 10,
            WebSocketOpcode::Other(other) => other,
        }
    }
}

/// WebSocket message as delivered in frame events
///
/// `payload_data` is the message text for text frames and base64 for binary frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketFrame {
    /// WebSocket opcode
    pub opcode: WebSocketOpcode,
    /// WebSocket mask flag
    #[serde(default)]
    pub mask: bool,
    /// Payload as delivered by the transport
    pub payload_data: String,
    /// Transport hint that the payload is text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_is_text: Option<bool>,
}

impl WebSocketFrame {
    /// Create a text message
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            opcode: WebSocketOpcode::Text,
            mask: false,
            payload_data: data.into(),
            payload_is_text: Some(true),
        }
    }

    /// Create a binary message from its base64 payload
    pub fn binary(base64_data: impl Into<String>) -> Self {
        Self {
            opcode: WebSocketOpcode::Binary,
            mask: false,
            payload_data: base64_data.into(),
            payload_is_text: Some(false),
        }
    }
}

/// `Network.webSocketCreated` params
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketCreatedEvent {
    /// Connection identifier
    pub request_id: RequestId,
    /// WebSocket URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// `Network.webSocketFrameReceived` / `Network.webSocketFrameSent` params
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketFrameEvent {
    /// Connection identifier
    pub request_id: RequestId,
    /// Transport timestamp
    pub timestamp: Timestamp,
    /// The message
    pub response: WebSocketFrame,
}
