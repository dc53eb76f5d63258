// CDP capture event types and error definitions
//
// This module is part of the ws-frame-inspector workspace.

pub mod domains;
pub mod errors;

// Re-export commonly used types
pub use domains::network::{
    Direction, RequestId, Timestamp, WebSocketCreatedEvent, WebSocketFrame,
    WebSocketFrameEvent, WebSocketOpcode,
};
pub use errors::{CaptureError, Result};

use serde::{Deserialize, Serialize};

/// Globally unique identifier of a captured frame
///
/// Assigned at capture time from a session-wide counter, starting at 1.
pub type FrameId = u64;

/// CDP Event message
/// Represents an unsolicited event delivered by the debugging transport
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CdpEvent {
    /// Event name in format "Domain.event"
    pub method: String,
    /// Event parameters
    #[serde(default)]
    pub params: serde_json::Value,
}

impl CdpEvent {
    /// Create a new event
    pub fn new(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Parse an event from its JSON text form
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if value.get("method").and_then(|m| m.as_str()).is_none() {
            return Err(CaptureError::InvalidEvent(
                "event has no string 'method' field".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Split the method into domain and event name
    ///
    /// CDP events have the format "Domain.event" (e.g., "Network.webSocketCreated")
    pub fn split_method(&self) -> Result<(&str, &str)> {
        match self.method.split_once('.') {
            Some((domain, event)) if !domain.is_empty() && !event.is_empty() => {
                Ok((domain, event))
            }
            _ => Err(CaptureError::InvalidMethod(self.method.clone())),
        }
    }
}
