//! tunwatch-app - Application state and update logic for tunwatch
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! dashboard: [`Message`]s are folded into [`AppState`] by
//! [`handler::update`], which may hand an [`UpdateAction`] back to the event
//! loop. It also owns configuration loading and OS signal handling.

pub mod config;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod signals;
pub mod state;

pub use config::{load_settings, FeedSettings, Settings};
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::{AppPhase, AppState};
