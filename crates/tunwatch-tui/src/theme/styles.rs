//! Semantic style builders.

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use tunwatch_core::ConnectionStatus;

use super::palette;

pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_row() -> Style {
    Style::default().bg(palette::SELECTED_ROW_BG)
}

/// Badge color for a feed status
pub fn status_style(status: ConnectionStatus) -> Style {
    let color = match status {
        ConnectionStatus::Connected => palette::STATUS_GREEN,
        ConnectionStatus::Connecting => palette::STATUS_BLUE,
        ConnectionStatus::ClosedReconnect => palette::STATUS_YELLOW,
        ConnectionStatus::FailedReconnect => palette::STATUS_RED,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Rounded panel with a dim border
pub fn panel_block<'a>() -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette::BORDER_DIM))
}
