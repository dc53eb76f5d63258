//! Main inspector implementation

use crate::{InspectorConfig, InspectorError, Result};
use capture_ingestion::{CaptureIngestion, WebSocketCapture};
use capture_store::{
    CaptureSession, ChangeSet, Command, ConnectionInfo, Frame, FrameSummary, SessionContext,
};
use capture_types::{CdpEvent, FrameId, RequestId};
use frame_decoder::{DecodedFrame, DecoderStats, Hypothesis};
use parking_lot::{Mutex, RwLock};
use search_index::IndexConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// WebSocket frame inspector
///
/// Owns one capture session, the ingestion router feeding it and the event pump
/// that drains the transport channel. All reads and writes of the session go
/// through one lock, so every event is applied in full before anyone can
/// observe it.
///
/// # Example
///
/// ```
/// use inspector_component::{Inspector, InspectorConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let inspector = Inspector::new(InspectorConfig::default())?;
/// inspector
///     .ingest_json(r#"{"method":"Network.webSocketFrameReceived","params":{
///         "requestId":"c1","timestamp":1.0,
///         "response":{"opcode":1,"payloadData":"hello"}}}"#)
///     .await?;
///
/// assert_eq!(inspector.search("hel").len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct Inspector {
    /// Configuration for this inspector
    config: InspectorConfig,

    /// Capture session shared with the ingestion handlers
    session: Arc<RwLock<CaptureSession>>,

    /// Routes transport events to domain handlers
    ingestion: Arc<CaptureIngestion>,

    /// Event channel of the running pump
    sender: Mutex<Option<mpsc::Sender<CdpEvent>>>,

    /// Pump task handle (when running)
    pump_handle: Mutex<Option<JoinHandle<()>>>,

    /// Change notifications for observers
    changes: broadcast::Sender<ChangeSet>,

    /// Whether the pump is currently running
    running: Arc<AtomicBool>,
}

impl Inspector {
    /// Create a new inspector with the given configuration
    ///
    /// # Errors
    ///
    /// Returns [`InspectorError::InvalidConfiguration`] when a capacity or the
    /// token length is zero.
    pub fn new(config: InspectorConfig) -> Result<Self> {
        debug!("Creating Inspector with config: {:?}", config);
        Self::validate(&config)?;

        let context = SessionContext::new()
            .with_hypothesis(config.initial_hypothesis())
            .with_index_config(IndexConfig {
                gram_length: config.gram_length(),
            });
        let session = Arc::new(RwLock::new(CaptureSession::with_context(context)));

        let ingestion = Arc::new(CaptureIngestion::new());
        ingestion.register_handler(Arc::new(WebSocketCapture::new(session.clone())));

        let (changes, _) = broadcast::channel(config.change_channel_capacity());

        Ok(Self {
            config,
            session,
            ingestion,
            sender: Mutex::new(None),
            pump_handle: Mutex::new(None),
            changes,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    fn validate(config: &InspectorConfig) -> Result<()> {
        if config.event_channel_capacity() == 0 {
            return Err(InspectorError::InvalidConfiguration(
                "event channel capacity must be non-zero".to_string(),
            ));
        }
        if config.change_channel_capacity() == 0 {
            return Err(InspectorError::InvalidConfiguration(
                "change channel capacity must be non-zero".to_string(),
            ));
        }
        if config.gram_length() == 0 {
            return Err(InspectorError::InvalidConfiguration(
                "gram length must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start the event pump
    ///
    /// Events sent through [`sender`](Self::sender) are ingested in order until
    /// [`stop`](Self::stop) is called.
    ///
    /// # Errors
    ///
    /// Returns [`InspectorError::AlreadyRunning`] if the pump is running.
    pub async fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(InspectorError::AlreadyRunning);
        }

        let (sender, mut receiver) = mpsc::channel::<CdpEvent>(self.config.event_channel_capacity());
        let ingestion = self.ingestion.clone();
        let changes = self.changes.clone();

        let handle = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                match ingestion.handle_event(event).await {
                    Ok(changeset) => notify(&changes, changeset),
                    Err(e) => warn!("Failed to capture event: {}", e),
                }
            }
            debug!("Event channel closed");
        });

        *self.sender.lock() = Some(sender);
        *self.pump_handle.lock() = Some(handle);

        info!(
            "Inspector started (event channel capacity {})",
            self.config.event_channel_capacity()
        );
        Ok(())
    }

    /// Stop the event pump
    ///
    /// Events still queued in the channel are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`InspectorError::NotRunning`] if the pump is not running.
    pub async fn stop(&self) -> Result<()> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(InspectorError::NotRunning);
        }

        info!("Stopping inspector");
        self.sender.lock().take();
        let handle = self.pump_handle.lock().take();
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = handle {
            handle.abort();
            if let Err(e) = handle.await {
                if e.is_panic() {
                    return Err(anyhow::anyhow!("event pump panicked: {}", e).into());
                }
            }
        }

        info!("Inspector stopped");
        Ok(())
    }

    /// Check if the event pump is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Channel for the transport to push events into
    ///
    /// # Errors
    ///
    /// Returns [`InspectorError::NotRunning`] if the pump is not running.
    pub fn sender(&self) -> Result<mpsc::Sender<CdpEvent>> {
        self.sender.lock().clone().ok_or(InspectorError::NotRunning)
    }

    /// Receive the change set of every mutation from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeSet> {
        self.changes.subscribe()
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// The underlying capture session
    pub fn session(&self) -> Arc<RwLock<CaptureSession>> {
        self.session.clone()
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Capture one event directly, bypassing the pump
    pub async fn ingest(&self, event: CdpEvent) -> Result<ChangeSet> {
        let changeset = self.ingestion.handle_event(event).await?;
        notify(&self.changes, changeset.clone());
        Ok(changeset)
    }

    /// Capture one raw JSON event
    pub async fn ingest_json(&self, message: &str) -> Result<ChangeSet> {
        let changeset = self.ingestion.handle_message(message).await?;
        notify(&self.changes, changeset.clone());
        Ok(changeset)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Apply a store command
    pub fn apply(&self, command: Command) -> ChangeSet {
        let changeset = self.session.write().apply(command);
        notify(&self.changes, changeset.clone());
        changeset
    }

    pub fn select_connection(&self, id: impl Into<RequestId>) -> ChangeSet {
        self.apply(Command::SelectConnection { id: id.into() })
    }

    pub fn select_frame(&self, id: Option<FrameId>) -> ChangeSet {
        self.apply(Command::SelectFrame { id })
    }

    pub fn clear_frames(&self) -> ChangeSet {
        self.apply(Command::ClearFrames)
    }

    pub fn set_search(&self, query: impl Into<String>) -> ChangeSet {
        self.apply(Command::Search {
            query: query.into(),
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Connections in creation order
    pub fn list_connections(&self) -> Vec<ConnectionInfo> {
        self.session.read().store.list_connections()
    }

    pub fn active_connection(&self) -> Option<RequestId> {
        self.session.read().store.active_connection().cloned()
    }

    pub fn frames_of(&self, id: &str) -> Vec<Frame> {
        self.session.read().store.frames_of(id).to_vec()
    }

    pub fn active_frame(&self) -> Option<Frame> {
        self.session.read().store.active_frame().cloned()
    }

    /// Frames of the active connection matching `query`; all of them for an empty query
    pub fn search(&self, query: &str) -> Vec<Frame> {
        self.session
            .read()
            .store
            .search(query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn search_value(&self) -> String {
        self.session.read().store.search_value().to_string()
    }

    /// Frames matching the stored search value
    pub fn search_result(&self) -> Vec<Frame> {
        self.session
            .read()
            .store
            .search_result()
            .into_iter()
            .cloned()
            .collect()
    }

    /// List rows for the stored search value
    pub fn frame_list(&self) -> Vec<FrameSummary> {
        let mut session = self.session.write();
        let frames: Vec<Frame> = session.store.search_result().into_iter().cloned().collect();
        frames.iter().map(|frame| session.summary(frame)).collect()
    }

    /// Decode a frame through the session decoder
    pub fn decode(&self, frame: &Frame) -> Option<DecodedFrame> {
        self.session.write().decode(frame)
    }

    pub fn decode_active_frame(&self) -> Option<DecodedFrame> {
        self.session.write().decode_active_frame()
    }

    pub fn summary(&self, frame: &Frame) -> FrameSummary {
        self.session.write().summary(frame)
    }

    /// Hypothesis the decoder will try first
    pub fn cached_hypothesis(&self) -> Hypothesis {
        self.session.read().context.decoder().cached()
    }

    pub fn decoder_stats(&self) -> DecoderStats {
        self.session.read().context.decoder().stats().clone()
    }
}

/// Publish a non-empty change set; having no subscribers is fine
fn notify(changes: &broadcast::Sender<ChangeSet>, changeset: ChangeSet) {
    if !changeset.is_empty() {
        let _ = changes.send(changeset);
    }
}
