//! A capture store bundled with its session context

use crate::command::{ChangeSet, Command};
use crate::context::SessionContext;
use crate::frame::{Frame, FrameSummary};
use crate::store::CaptureStore;
use frame_decoder::DecodedFrame;

/// One capture session: the store plus the session-wide state it needs
#[derive(Debug, Default)]
pub struct CaptureSession {
    pub context: SessionContext,
    pub store: CaptureStore,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: SessionContext) -> Self {
        Self {
            context,
            store: CaptureStore::new(),
        }
    }

    /// Apply a command to the store
    pub fn apply(&mut self, command: Command) -> ChangeSet {
        self.store.apply(&mut self.context, command)
    }

    /// Decode a frame through the session decoder
    pub fn decode(&mut self, frame: &Frame) -> Option<DecodedFrame> {
        self.store.decode(&mut self.context, frame)
    }

    pub fn summary(&mut self, frame: &Frame) -> FrameSummary {
        self.store.summary(&mut self.context, frame)
    }

    /// Decode the active frame, if any
    pub fn decode_active_frame(&mut self) -> Option<DecodedFrame> {
        let frame = self.store.active_frame()?;
        self.context.decode(&frame.raw_bytes())
    }
}
