//! Capture store
//!
//! Connections in creation order, the active connection pointer and the current
//! search value. Operations that assign ids, resolve time or decode take the
//! [`SessionContext`] explicitly.

use crate::command::{ChangeSet, Command, StoreChange};
use crate::connection::{Connection, ConnectionInfo};
use crate::context::SessionContext;
use crate::frame::{Frame, FrameSummary};
use capture_types::{Direction, FrameId, RequestId, Timestamp, WebSocketFrame};
use frame_decoder::DecodedFrame;
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Default)]
pub struct CaptureStore {
    /// Connections in creation order
    connections: Vec<Connection>,
    /// Connection id -> position in `connections`
    positions: HashMap<RequestId, usize>,
    active_connection: Option<RequestId>,
    search_value: String,
}

impl CaptureStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Register a connection; an existing id is left untouched
    pub fn create_connection(
        &mut self,
        ctx: &SessionContext,
        id: RequestId,
        url: Option<String>,
    ) -> ChangeSet {
        if self.positions.contains_key(&id) {
            trace!("Connection {} already tracked", id);
            return ChangeSet::new();
        }
        debug!("Tracking WebSocket connection: {} ({:?})", id, url);
        self.insert(Connection::new(id, url, ctx.index_config()));
        StoreChange::ConnectionsChanged.into()
    }

    /// The connection with `id`, created empty if unknown
    pub fn ensure_connection(&mut self, ctx: &SessionContext, id: &RequestId) -> &mut Connection {
        let pos = match self.positions.get(id).copied() {
            Some(pos) => pos,
            None => {
                debug!("Implicitly tracking WebSocket connection: {}", id);
                self.insert(Connection::new(id.clone(), None, ctx.index_config()))
            }
        };
        &mut self.connections[pos]
    }

    /// Record a message on a connection
    ///
    /// Only text and binary messages are kept. The frame gets the next session id,
    /// is indexed by its best text form and its connection becomes active.
    pub fn append_frame(
        &mut self,
        ctx: &mut SessionContext,
        connection: &RequestId,
        direction: Direction,
        timestamp: Timestamp,
        message: WebSocketFrame,
    ) -> ChangeSet {
        if !message.opcode.carries_data() {
            trace!(
                "Ignoring {:?} message on {} ({})",
                message.opcode,
                connection,
                direction
            );
            return ChangeSet::new();
        }

        let mut changes = ChangeSet::new();
        if !self.positions.contains_key(connection) {
            changes.push(StoreChange::ConnectionsChanged);
        }

        let id = ctx.next_frame_id();
        let time = ctx.resolve_time(timestamp);
        let Some(frame) = Frame::from_message(id, direction, time, message) else {
            return changes;
        };
        let decoded = ctx.decode(&frame.raw_bytes());
        let text = frame.indexed_text(decoded.as_ref()).into_owned();

        debug!(
            "Adding WebSocket frame {} to {} ({}, {} bytes, {})",
            id,
            connection,
            direction,
            frame.length,
            decoded
                .as_ref()
                .map(|d| d.short_name())
                .unwrap_or_else(|| "not decodable".to_string())
        );

        self.ensure_connection(ctx, connection).push(frame, &text);
        changes.push(StoreChange::FramesChanged {
            connection: connection.clone(),
        });
        changes.push(StoreChange::IndexChanged {
            connection: connection.clone(),
        });
        changes.merge(self.activate(connection));
        changes
    }

    /// Make `id` the active connection
    ///
    /// An unknown id becomes active anyway and resolves to no frames.
    pub fn select_connection(&mut self, id: RequestId) -> ChangeSet {
        debug!("Selecting connection {}", id);
        self.activate(&id)
    }

    /// Point the active connection at a frame
    pub fn select_frame(&mut self, id: Option<FrameId>) -> ChangeSet {
        let Some(active) = self.active_connection.clone() else {
            trace!("No active connection, ignoring frame selection");
            return ChangeSet::new();
        };
        let changed = self
            .position(active.as_str())
            .map(|pos| self.connections[pos].set_active_frame(id))
            .unwrap_or(false);
        if changed {
            StoreChange::ActiveFrameChanged { connection: active }.into()
        } else {
            ChangeSet::new()
        }
    }

    /// Drop all frames of the active connection and reset the search value
    ///
    /// Frame ids keep increasing afterwards.
    pub fn clear_frames(&mut self) -> ChangeSet {
        let Some(active) = self.active_connection.clone() else {
            return ChangeSet::new();
        };

        let mut changes = ChangeSet::new();
        if let Some(pos) = self.position(active.as_str()) {
            let connection = &mut self.connections[pos];
            let had_frames = !connection.frames().is_empty() || !connection.index().is_empty();
            let had_active = connection.active_frame_id().is_some();
            connection.clear();

            if had_frames {
                debug!("Cleared frames of {}", active);
                changes.push(StoreChange::FramesChanged {
                    connection: active.clone(),
                });
                changes.push(StoreChange::IndexChanged {
                    connection: active.clone(),
                });
            }
            if had_active {
                changes.push(StoreChange::ActiveFrameChanged { connection: active });
            }
        }
        changes.merge(self.set_search(String::new()));
        changes
    }

    /// Store the search string
    pub fn set_search(&mut self, query: impl Into<String>) -> ChangeSet {
        let query = query.into();
        if self.search_value == query {
            return ChangeSet::new();
        }
        self.search_value = query;
        StoreChange::SearchValueChanged.into()
    }

    /// Apply a command
    pub fn apply(&mut self, ctx: &mut SessionContext, command: Command) -> ChangeSet {
        match command {
            Command::CreateConnection { id, url } => self.create_connection(ctx, id, url),
            Command::AppendFrame {
                connection,
                direction,
                timestamp,
                message,
            } => self.append_frame(ctx, &connection, direction, timestamp, message),
            Command::SelectConnection { id } => self.select_connection(id),
            Command::SelectFrame { id } => self.select_frame(id),
            Command::ClearFrames => self.clear_frames(),
            Command::Search { query } => self.set_search(query),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Connections in creation order
    pub fn list_connections(&self) -> Vec<ConnectionInfo> {
        self.connections.iter().map(Connection::info).collect()
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.position(id).map(|pos| &self.connections[pos])
    }

    /// Id of the active connection, which may not be tracked
    pub fn active_connection(&self) -> Option<&RequestId> {
        self.active_connection.as_ref()
    }

    /// Frames of a connection in arrival order; empty for unknown ids
    pub fn frames_of(&self, id: &str) -> &[Frame] {
        self.connection(id).map(Connection::frames).unwrap_or(&[])
    }

    /// The selected frame of the active connection
    pub fn active_frame(&self) -> Option<&Frame> {
        self.active().and_then(Connection::active_frame)
    }

    /// Frames of the active connection matching `query`
    ///
    /// An empty query returns every frame of the active connection.
    pub fn search(&self, query: &str) -> Vec<&Frame> {
        let Some(connection) = self.active() else {
            return Vec::new();
        };
        if query.trim().is_empty() {
            return connection.frames().iter().collect();
        }
        let ids = connection.index().search(query);
        trace!("Search {:?} on {}: {} hits", query, connection.id(), ids.len());
        connection.frames_with_ids(&ids)
    }

    pub fn search_value(&self) -> &str {
        &self.search_value
    }

    /// [`search`](Self::search) for the stored search value
    pub fn search_result(&self) -> Vec<&Frame> {
        self.search(&self.search_value)
    }

    /// Decode a frame for display
    pub fn decode(&self, ctx: &mut SessionContext, frame: &Frame) -> Option<DecodedFrame> {
        ctx.decode(&frame.raw_bytes())
    }

    /// List-row view of a frame
    pub fn summary(&self, ctx: &mut SessionContext, frame: &Frame) -> FrameSummary {
        let decoded = self.decode(ctx, frame);
        FrameSummary::new(frame, decoded.as_ref())
    }

    fn active(&self) -> Option<&Connection> {
        self.active_connection
            .as_ref()
            .and_then(|id| self.connection(id.as_str()))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    fn insert(&mut self, connection: Connection) -> usize {
        let pos = self.connections.len();
        self.positions.insert(connection.id().clone(), pos);
        self.connections.push(connection);
        pos
    }

    fn activate(&mut self, id: &RequestId) -> ChangeSet {
        if self.active_connection.as_ref() == Some(id) {
            return ChangeSet::new();
        }
        self.active_connection = Some(id.clone());
        StoreChange::ActiveConnectionChanged.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use pretty_assertions::assert_eq;

    fn setup() -> (CaptureStore, SessionContext) {
        (
            CaptureStore::new(),
            SessionContext::new().with_clock(FixedClock(1_000.0)),
        )
    }

    fn append(store: &mut CaptureStore, ctx: &mut SessionContext, conn: &str, text: &str) -> ChangeSet {
        store.append_frame(
            ctx,
            &conn.into(),
            Direction::Incoming,
            Timestamp(0.0),
            WebSocketFrame::text(text),
        )
    }

    fn ids(frames: &[&Frame]) -> Vec<FrameId> {
        frames.iter().map(|f| f.id).collect()
    }

    #[test]
    fn test_create_connection_is_idempotent() {
        let (mut store, ctx) = setup();
        let changes = store.create_connection(&ctx, "c1".into(), Some("ws://a".into()));
        assert!(changes.contains(&StoreChange::ConnectionsChanged));

        let changes = store.create_connection(&ctx, "c1".into(), Some("ws://b".into()));
        assert!(changes.is_empty());

        let list = store.list_connections();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].url.as_deref(), Some("ws://a"));
    }

    #[test]
    fn test_ensure_connection() {
        let (mut store, ctx) = setup();
        store.ensure_connection(&ctx, &"c1".into());
        store.ensure_connection(&ctx, &"c1".into());
        assert_eq!(store.list_connections().len(), 1);
        assert!(store.connection("c1").is_some());
    }

    #[test]
    fn test_append_creates_and_activates() {
        let (mut store, mut ctx) = setup();
        let changes = append(&mut store, &mut ctx, "c1", "hello");

        assert!(changes.contains(&StoreChange::ConnectionsChanged));
        assert!(changes.contains(&StoreChange::ActiveConnectionChanged));
        assert!(changes.contains(&StoreChange::FramesChanged {
            connection: "c1".into()
        }));
        assert_eq!(store.active_connection().map(RequestId::as_str), Some("c1"));

        let frame = &store.frames_of("c1")[0];
        assert_eq!(frame.id, 1);
        assert_eq!(frame.time, 1_000.0);
    }

    #[test]
    fn test_append_ignores_control_messages() {
        let (mut store, mut ctx) = setup();
        let ping = WebSocketFrame {
            opcode: 9u8.into(),
            ..WebSocketFrame::text("")
        };
        let changes = store.append_frame(&mut ctx, &"c1".into(), Direction::Incoming, Timestamp(0.0), ping);

        assert!(changes.is_empty());
        assert!(store.list_connections().is_empty());
        assert_eq!(ctx.last_frame_id(), 0);
    }

    #[test]
    fn test_select_frame_without_active_connection() {
        let (mut store, _) = setup();
        assert!(store.select_frame(Some(1)).is_empty());
        assert!(store.active_frame().is_none());
    }

    #[test]
    fn test_select_frame() {
        let (mut store, mut ctx) = setup();
        append(&mut store, &mut ctx, "c1", "a");
        append(&mut store, &mut ctx, "c1", "b");

        let changes = store.select_frame(Some(2));
        assert!(changes.contains(&StoreChange::ActiveFrameChanged {
            connection: "c1".into()
        }));
        assert_eq!(store.active_frame().map(|f| f.id), Some(2));

        store.select_frame(Some(99));
        assert!(store.active_frame().is_none());

        store.select_frame(None);
        assert!(store.active_frame().is_none());
    }

    #[test]
    fn test_select_unknown_connection() {
        let (mut store, mut ctx) = setup();
        append(&mut store, &mut ctx, "c1", "a");

        store.select_connection("nope".into());
        assert_eq!(store.active_connection().map(RequestId::as_str), Some("nope"));
        assert!(store.search("").is_empty());
        assert!(store.frames_of("nope").is_empty());
        assert!(store.select_frame(Some(1)).is_empty());
    }

    #[test]
    fn test_search_empty_and_no_match() {
        let (mut store, mut ctx) = setup();
        append(&mut store, &mut ctx, "c1", "alpha");
        append(&mut store, &mut ctx, "c1", "beta");

        assert_eq!(ids(&store.search("")), vec![1, 2]);
        assert_eq!(ids(&store.search("ph")), vec![1]);
        assert_eq!(ids(&store.search("a")), vec![1, 2]);
        assert!(store.search("zzz").is_empty());
    }

    #[test]
    fn test_search_only_active_connection() {
        let (mut store, mut ctx) = setup();
        append(&mut store, &mut ctx, "c1", "shared");
        append(&mut store, &mut ctx, "c2", "shared");

        assert_eq!(ids(&store.search("shared")), vec![2]);
        store.select_connection("c1".into());
        assert_eq!(ids(&store.search("shared")), vec![1]);
    }

    #[test]
    fn test_search_value() {
        let (mut store, mut ctx) = setup();
        append(&mut store, &mut ctx, "c1", "alpha");
        append(&mut store, &mut ctx, "c1", "beta");

        assert!(store.set_search("bet").contains(&StoreChange::SearchValueChanged));
        assert!(store.set_search("bet").is_empty());
        assert_eq!(store.search_value(), "bet");
        assert_eq!(ids(&store.search_result()), vec![2]);
    }

    #[test]
    fn test_clear_frames() {
        let (mut store, mut ctx) = setup();
        append(&mut store, &mut ctx, "c1", "alpha");
        store.select_frame(Some(1));
        store.set_search("alp");

        let changes = store.clear_frames();
        assert!(changes.contains(&StoreChange::FramesChanged {
            connection: "c1".into()
        }));
        assert!(changes.contains(&StoreChange::SearchValueChanged));
        assert!(store.frames_of("c1").is_empty());
        assert!(store.connection("c1").unwrap().index().is_empty());
        assert!(store.active_frame().is_none());
        assert_eq!(store.search_value(), "");

        assert!(store.clear_frames().is_empty());

        append(&mut store, &mut ctx, "c1", "again");
        assert_eq!(store.frames_of("c1")[0].id, 2);
    }

    #[test]
    fn test_clear_without_active_connection() {
        let (mut store, _) = setup();
        store.set_search("x");
        assert!(store.clear_frames().is_empty());
        assert_eq!(store.search_value(), "x");
    }

    #[test]
    fn test_apply_commands() {
        let (mut store, mut ctx) = setup();
        store.apply(
            &mut ctx,
            Command::CreateConnection {
                id: "c1".into(),
                url: None,
            },
        );
        store.apply(
            &mut ctx,
            Command::AppendFrame {
                connection: "c1".into(),
                direction: Direction::Outgoing,
                timestamp: Timestamp(2.0),
                message: WebSocketFrame::text("hi"),
            },
        );
        store.apply(&mut ctx, Command::SelectFrame { id: Some(1) });
        assert_eq!(store.active_frame().map(|f| f.direction), Some(Direction::Outgoing));

        let changes = store.apply(
            &mut ctx,
            Command::Search {
                query: "h".into(),
            },
        );
        assert!(changes.contains(&StoreChange::SearchValueChanged));

        store.apply(&mut ctx, Command::ClearFrames);
        assert!(store.frames_of("c1").is_empty());
    }

    #[test]
    fn test_summary() {
        let (mut store, mut ctx) = setup();
        append(&mut store, &mut ctx, "c1", "hello");
        let frame = store.frames_of("c1")[0].clone();

        let summary = store.summary(&mut ctx, &frame);
        assert_eq!(summary.label, "Text Frame");
        assert_eq!(summary.length, 5);
        assert!(store.decode(&mut ctx, &frame).is_none());
    }
}
