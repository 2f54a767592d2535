//! Centered single-line message inside a panel

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

/// Status or waiting line shown in place of the table
pub struct MessagePanel<'a> {
    text: &'a str,
    style: Style,
}

impl<'a> MessagePanel<'a> {
    pub fn new(text: &'a str, style: Style) -> Self {
        Self { text, style }
    }
}

impl Widget for MessagePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::panel_block();
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let line_area = Rect {
            y: inner.y + inner.height / 2,
            height: 1,
            ..inner
        };
        Paragraph::new(self.text)
            .style(self.style)
            .alignment(Alignment::Center)
            .render(line_area, buf);
    }
}
