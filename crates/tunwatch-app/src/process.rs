//! Message processing: runs the update loop and dispatches actions

use tunwatch_core::prelude::*;

use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::state::AppState;

/// Process a message and every follow-up message it produces
pub fn process_message(state: &mut AppState, message: Message) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);
        if let Some(action) = result.action {
            handle_action(action);
        }
        msg = result.message;
    }
}

/// Perform an action requested by the update function
pub fn handle_action(action: UpdateAction) {
    match action {
        UpdateAction::CloseConnection { id } => {
            info!(
                "Close requested for connection {}; the status feed has no control channel",
                id
            );
        }
    }
}
