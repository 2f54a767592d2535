//! Handler module - TEA update function and key handling
//!
//! - `update`: main `update()` function and message dispatch
//! - `keys`: key-to-message mapping

pub(crate) mod keys;
pub(crate) mod update;


use tunwatch_core::EntityId;

use crate::message::Message;

pub use keys::handle_key;
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Close a tunnel connection on the server.
    ///
    /// The status feed is read-only, so the event loop only records the
    /// request.
    CloseConnection { id: EntityId },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
