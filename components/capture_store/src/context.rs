//! Session-scoped state shared by every connection

use crate::clock::{Clock, SessionClock, SystemClock};
use capture_types::{FrameId, Timestamp};
use frame_decoder::{DecodedFrame, FrameDecoder, Hypothesis};
use search_index::IndexConfig;

/// Everything that is global to one capture session
///
/// There is exactly one of these per session; it is passed to the store
/// operations that assign ids, resolve times or decode frames.
#[derive(Debug)]
pub struct SessionContext {
    /// Last frame id handed out (0 = none yet)
    last_frame_id: FrameId,
    clock: SessionClock,
    wall_clock: Box<dyn Clock>,
    decoder: FrameDecoder,
    index_config: IndexConfig,
}

impl SessionContext {
    /// Create a context with the system clock and default decoder/index settings
    pub fn new() -> Self {
        Self {
            last_frame_id: 0,
            clock: SessionClock::new(),
            wall_clock: Box::new(SystemClock),
            decoder: FrameDecoder::new(),
            index_config: IndexConfig::default(),
        }
    }

    /// Replace the wall clock source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.wall_clock = Box::new(clock);
        self
    }

    /// Start the decoder cache from a specific hypothesis
    pub fn with_hypothesis(mut self, hypothesis: Hypothesis) -> Self {
        self.decoder = FrameDecoder::with_hypothesis(hypothesis);
        self
    }

    /// Settings for indexes of connections created from now on
    pub fn with_index_config(mut self, config: IndexConfig) -> Self {
        self.index_config = config;
        self
    }

    /// Hand out the next frame id; ids are never reused
    pub fn next_frame_id(&mut self) -> FrameId {
        self.last_frame_id += 1;
        self.last_frame_id
    }

    /// Last id handed out, 0 if none
    pub fn last_frame_id(&self) -> FrameId {
        self.last_frame_id
    }

    /// Absolute time in ms since epoch for a transport timestamp
    pub fn resolve_time(&mut self, timestamp: Timestamp) -> f64 {
        self.clock.resolve(timestamp, self.wall_clock.as_ref())
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    /// Decode raw bytes through the session's cached decoder
    pub fn decode(&mut self, bytes: &[u8]) -> Option<DecodedFrame> {
        self.decoder.decode(bytes)
    }

    pub fn index_config(&self) -> IndexConfig {
        self.index_config
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
