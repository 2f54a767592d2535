//! Message types for the application (TEA pattern)

use tunwatch_core::EntityId;
use tunwatch_feed::FeedState;

use crate::input_key::InputKey;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// New publication from the feed controller
    Feed(FeedState),

    /// Periodic redraw tick
    Tick,

    /// Quit the application (keys or OS signal)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Table navigation
    // ─────────────────────────────────────────────────────────
    SelectPrevious,
    SelectNext,
    SelectFirst,
    SelectLast,
    PageUp,
    PageDown,

    /// Ask to close the connection under the cursor
    CloseSelected,

    /// Close a tunnel connection by id
    CloseConnection { id: EntityId },
}
