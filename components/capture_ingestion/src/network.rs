//! Network domain: WebSocket capture

use crate::EventHandler;
use async_trait::async_trait;
use capture_store::{CaptureSession, ChangeSet, Command};
use capture_types::{
    CaptureError, Direction, WebSocketCreatedEvent, WebSocketFrameEvent,
};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Records Network WebSocket events into a capture session
pub struct WebSocketCapture {
    session: Arc<RwLock<CaptureSession>>,
}

impl WebSocketCapture {
    pub fn new(session: Arc<RwLock<CaptureSession>>) -> Self {
        Self { session }
    }

    /// The session events are recorded into
    pub fn session(&self) -> &Arc<RwLock<CaptureSession>> {
        &self.session
    }

    /// Translate a Network event into a store command
    ///
    /// Returns `None` for events that are not captured.
    pub fn command_for(event: &str, params: Value) -> Result<Option<Command>, CaptureError> {
        let command = match event {
            "webSocketCreated" => {
                let created: WebSocketCreatedEvent = parse_params(event, params)?;
                Command::CreateConnection {
                    id: created.request_id,
                    url: created.url,
                }
            }
            "webSocketFrameReceived" => frame_command(event, params, Direction::Incoming)?,
            "webSocketFrameSent" => frame_command(event, params, Direction::Outgoing)?,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}

#[async_trait]
impl EventHandler for WebSocketCapture {
    fn name(&self) -> &str {
        "Network"
    }

    async fn handle_event(&self, event: &str, params: Value) -> Result<ChangeSet, CaptureError> {
        let Some(command) = Self::command_for(event, params)? else {
            debug!("Ignoring Network.{}", event);
            return Ok(ChangeSet::new());
        };

        trace!("Applying {:?}", command);
        Ok(self.session.write().apply(command))
    }
}

fn frame_command(
    event: &str,
    params: Value,
    direction: Direction,
) -> Result<Command, CaptureError> {
    let frame: WebSocketFrameEvent = parse_params(event, params)?;
    Ok(Command::AppendFrame {
        connection: frame.request_id,
        direction,
        timestamp: frame.timestamp,
        message: frame.response,
    })
}

fn parse_params<T: DeserializeOwned>(event: &str, params: Value) -> Result<T, CaptureError> {
    serde_json::from_value(params)
        .map_err(|e| CaptureError::invalid_params(format!("Network.{}", event), e))
}
