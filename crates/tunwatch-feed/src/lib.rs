//! tunwatch-feed - Live status feed for tunwatch
//!
//! Owns the connection lifecycle to the tunnel server's status socket:
//! opening the feed, detecting its loss, and retrying on a clamped delay
//! schedule while publishing a well-defined [`FeedState`] at every step.
//!
//! ## Modules
//!
//! - [`schedule`]: [`RetrySchedule`], the clamped backoff sequence.
//! - [`machine`]: [`FeedMachine`], the synchronous lifecycle state machine.
//! - [`transport`]: the [`Connector`] seam and its WebSocket implementation.
//! - [`controller`]: [`FeedController`], the async driver that owns the
//!   socket and the retry countdown timer.

pub mod controller;
pub mod machine;
pub mod schedule;
pub mod transport;

pub use controller::{FeedConfig, FeedController, DEFAULT_TICK_INTERVAL, DEFAULT_URI};
pub use machine::{FeedMachine, FeedState};
pub use schedule::RetrySchedule;
pub use transport::{Connector, SocketHandle, SocketId, TransportEvent, TransportEventKind, WsConnector};
