//! WebSocket connections and their frame history

use crate::frame::Frame;
use capture_types::{FrameId, RequestId};
use search_index::{IndexConfig, SearchIndex};
use serde::{Deserialize, Serialize};

/// Identity of a connection as shown in the connection list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A tracked WebSocket connection
///
/// Frames are kept in arrival order and only ever removed all at once.
#[derive(Debug, Clone)]
pub struct Connection {
    id: RequestId,
    url: Option<String>,
    frames: Vec<Frame>,
    index: SearchIndex,
    active_frame: Option<FrameId>,
}

impl Connection {
    /// Create an empty connection
    pub fn new(id: RequestId, url: Option<String>, index_config: IndexConfig) -> Self {
        Self {
            id,
            url,
            frames: Vec::new(),
            index: SearchIndex::with_config(index_config),
            active_frame: None,
        }
    }

    pub fn id(&self) -> &RequestId {
        &self.id
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id.clone(),
            url: self.url.clone(),
        }
    }

    /// Frames in arrival order
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Look up a frame by id
    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        // ids are assigned in increasing order, so the list is sorted by id
        self.frames
            .binary_search_by_key(&id, |frame| frame.id)
            .ok()
            .map(|pos| &self.frames[pos])
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn active_frame_id(&self) -> Option<FrameId> {
        self.active_frame
    }

    /// The active frame, if its id is still present
    pub fn active_frame(&self) -> Option<&Frame> {
        self.active_frame.and_then(|id| self.frame(id))
    }

    /// Append a frame and index `text` under its id
    pub(crate) fn push(&mut self, frame: Frame, text: &str) {
        self.index.add(frame.id, text);
        self.frames.push(frame);
    }

    /// Returns whether the pointer changed
    pub(crate) fn set_active_frame(&mut self, id: Option<FrameId>) -> bool {
        if self.active_frame == id {
            return false;
        }
        self.active_frame = id;
        true
    }

    /// Drop all frames, the index and the active frame
    pub(crate) fn clear(&mut self) {
        self.frames.clear();
        self.index.reset();
        self.active_frame = None;
    }

    /// Frames whose ids are in `ids`, in frame order
    pub(crate) fn frames_with_ids(&self, ids: &[FrameId]) -> Vec<&Frame> {
        ids.iter().filter_map(|id| self.frame(*id)).collect()
    }
}
