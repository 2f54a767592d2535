//! Main render/view function (View in TEA pattern)


use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use tunwatch_app::state::AppState;
use tunwatch_core::Display;

use super::{layout, widgets};
use crate::theme::{palette, styles};

/// Render the complete UI (View function in TEA)
///
/// Pure with respect to `state`: everything shown comes from the rendered
/// [`Display`] plus the selection and notice.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area);

    frame.render_widget(
        widgets::Header::new(&state.uri, state.feed.status, state.feed.countdown),
        areas.header,
    );

    match &state.display {
        Display::StatusLine { text } => frame.render_widget(
            widgets::MessagePanel::new(text, styles::status_style(state.feed.status)),
            areas.body,
        ),
        Display::Waiting { text } => frame.render_widget(
            widgets::MessagePanel::new(text, styles::text_muted()),
            areas.body,
        ),
        Display::Table { header, rows } => frame.render_widget(
            widgets::ConnectionTable::new(header, rows, state.selected),
            areas.body,
        ),
    }

    frame.render_widget(
        widgets::Footer::new(state.notice.as_deref(), state.feed.received_at),
        areas.footer,
    );
}
