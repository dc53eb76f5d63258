//! WebSocket frame inspector orchestration
//!
//! This crate ties the capture session, the event ingestion router and an async
//! event pump together behind one [`Inspector`] handle.
//!
//! # Example
//!
//! ```no_run
//! use capture_types::CdpEvent;
//! use inspector_component::{Inspector, InspectorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InspectorConfig::builder()
//!         .event_channel_capacity(256)
//!         .build();
//!
//!     let inspector = Inspector::new(config)?;
//!     inspector.start().await?;
//!
//!     let events = inspector.sender()?;
//!     events
//!         .send(CdpEvent::from_json(
//!             r#"{"method":"Network.webSocketCreated","params":{"requestId":"1"}}"#,
//!         )?)
//!         .await?;
//!
//!     inspector.stop().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod inspector;

pub use config::{InspectorConfig, InspectorConfigBuilder};
pub use error::{InspectorError, Result};
pub use inspector::Inspector;
