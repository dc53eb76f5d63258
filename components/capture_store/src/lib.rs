//! WebSocket frame capture store
//!
//! Holds the per-connection frame history of one capture session, the active
//! connection/frame pointers and a full-text index per connection. All mutation
//! goes through named operations (or [`Command`] values) that report what they
//! changed as a [`ChangeSet`], so a presentation layer can re-render exactly the
//! affected views.
//!
//! Session-wide state (frame id counter, clock reference, decoder cache) lives in
//! [`SessionContext`] and is passed explicitly to the operations that need it.
//!
//! # Example
//!
//! ```
//! use capture_store::{CaptureSession, Command};
//! use capture_types::{Direction, Timestamp, WebSocketFrame};
//!
//! let mut session = CaptureSession::new();
//! session.apply(Command::CreateConnection { id: "c1".into(), url: None });
//! session.apply(Command::AppendFrame {
//!     connection: "c1".into(),
//!     direction: Direction::Incoming,
//!     timestamp: Timestamp(0.0),
//!     message: WebSocketFrame::text("hello"),
//! });
//!
//! let frames = session.store.frames_of("c1");
//! assert_eq!(frames.len(), 1);
//! assert_eq!(session.store.search("hel")[0].id, frames[0].id);
//! ```

pub mod clock;
pub mod command;
pub mod connection;
pub mod context;
pub mod frame;
pub mod session;
pub mod store;

pub use clock::{Clock, ClockReference, FixedClock, SessionClock, SystemClock};
pub use command::{ChangeSet, Command, StoreChange};
pub use connection::{Connection, ConnectionInfo};
pub use context::SessionContext;
pub use frame::{Frame, FrameContent, FrameSummary};
pub use session::CaptureSession;
pub use store::CaptureStore;
