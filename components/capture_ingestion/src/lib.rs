//! Capture event routing
//!
//! Turns CDP events from the debugging transport into capture store commands.
//! Events are routed by domain to registered [`EventHandler`]s; the Network
//! WebSocket events are handled by [`WebSocketCapture`].

pub mod network;

use async_trait::async_trait;
use capture_store::ChangeSet;
use capture_types::{CaptureError, CdpEvent};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub use network::WebSocketCapture;

/// Trait implemented by every event domain handler
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Domain name (e.g., "Network")
    fn name(&self) -> &str;

    /// Handle one event of this domain
    ///
    /// # Arguments
    /// * `event` - Event name without the domain prefix (e.g., "webSocketCreated")
    /// * `params` - Event parameters
    ///
    /// # Returns
    /// What changed in the store; events the handler does not care about yield an
    /// empty change set
    async fn handle_event(&self, event: &str, params: Value) -> Result<ChangeSet, CaptureError>;
}

/// Routes capture events to the registered domain handlers
pub struct CaptureIngestion {
    /// Registry of event handlers, keyed by domain name
    handlers: Arc<DashMap<String, Arc<dyn EventHandler>>>,
}

impl CaptureIngestion {
    /// Create a router with no handlers
    ///
    /// # Example
    /// ```
    /// use capture_ingestion::CaptureIngestion;
    ///
    /// let ingestion = CaptureIngestion::new();
    /// assert!(ingestion.domains().is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(DashMap::new()),
        }
    }

    /// Register a handler, replacing any handler for the same domain
    pub fn register_handler(&self, handler: Arc<dyn EventHandler>) {
        let name = handler.name().to_string();
        debug!("Registering event handler: {}", name);
        self.handlers.insert(name, handler);
    }

    /// Remove the handler of a domain
    pub fn unregister_handler(&self, domain: &str) -> Option<Arc<dyn EventHandler>> {
        debug!("Unregistering event handler: {}", domain);
        self.handlers.remove(domain).map(|(_, handler)| handler)
    }

    /// Names of the registered domains
    pub fn domains(&self) -> Vec<String> {
        self.handlers.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Route one event to its domain handler
    ///
    /// Events of unregistered domains are ignored.
    pub async fn handle_event(&self, event: CdpEvent) -> Result<ChangeSet, CaptureError> {
        let (domain, name) = event.split_method().map_err(|e| {
            warn!("Invalid event method: {}", event.method);
            e
        })?;

        // clone out of the map so no shard lock is held across the await
        let handler = match self.handlers.get(domain) {
            Some(entry) => entry.value().clone(),
            None => {
                debug!("No handler for domain {}, ignoring {}", domain, event.method);
                return Ok(ChangeSet::new());
            }
        };

        let name = name.to_string();
        handler.handle_event(&name, event.params).await
    }

    /// Parse a raw JSON event and route it
    pub async fn handle_message(&self, message: &str) -> Result<ChangeSet, CaptureError> {
        let event = CdpEvent::from_json(message).map_err(|e| {
            warn!("Dropping malformed event: {}", e);
            e
        })?;
        self.handle_event(event).await
    }
}

impl Default for CaptureIngestion {
    fn default() -> Self {
        Self::new()
    }
}
