//! Main update function - handles state transitions (TEA pattern)

use tunwatch_core::prelude::*;
use tunwatch_core::DisplayRow;

use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::{keys::handle_key, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Feed(feed) => {
            if feed.status != state.feed.status {
                debug!("Feed status {} -> {}", state.feed.status, feed.status);
            }
            state.apply_feed(feed);
            UpdateResult::none()
        }

        Message::Tick => UpdateResult::none(),

        // ─────────────────────────────────────────────────────────
        // Navigation
        // ─────────────────────────────────────────────────────────
        Message::SelectPrevious => navigate(state, AppState::select_previous),
        Message::SelectNext => navigate(state, AppState::select_next),
        Message::SelectFirst => navigate(state, AppState::select_first),
        Message::SelectLast => navigate(state, AppState::select_last),
        Message::PageUp => navigate(state, AppState::page_up),
        Message::PageDown => navigate(state, AppState::page_down),

        // ─────────────────────────────────────────────────────────
        // Close connection
        // ─────────────────────────────────────────────────────────
        Message::CloseSelected => match state.selected_row() {
            Some(DisplayRow::Connection { id, .. }) => {
                UpdateResult::message(Message::CloseConnection { id: id.clone() })
            }
            _ => UpdateResult::none(),
        },

        Message::CloseConnection { id } => {
            state.notice = Some(format!("close not supported for connection {id}"));
            UpdateResult::action(UpdateAction::CloseConnection { id })
        }
    }
}

fn navigate(state: &mut AppState, select: fn(&mut AppState)) -> UpdateResult {
    select(state);
    state.notice = None;
    UpdateResult::none()
}
