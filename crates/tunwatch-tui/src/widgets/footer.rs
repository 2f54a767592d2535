//! Footer bar: key hints, the current notice and the last update time

use chrono::{DateTime, Local};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use crate::theme::{palette, styles};

use super::truncate_str;

const HINTS: &str = " q quit  ↑/↓ select  c close ";

pub struct Footer<'a> {
    notice: Option<&'a str>,
    received_at: Option<DateTime<Local>>,
}

impl<'a> Footer<'a> {
    pub fn new(notice: Option<&'a str>, received_at: Option<DateTime<Local>>) -> Self {
        Self {
            notice,
            received_at,
        }
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let updated = self
            .received_at
            .map(|at| format!(" updated {} ", at.format("%H:%M:%S")))
            .unwrap_or_default();
        let updated_width = updated.chars().count() as u16;
        let left_room = area.width.saturating_sub(updated_width) as usize;

        let (x, _) = buf.set_stringn(area.x, area.y, HINTS, left_room, styles::text_muted());

        if let Some(notice) = self.notice {
            let room = left_room.saturating_sub((x - area.x) as usize);
            buf.set_string(
                x,
                area.y,
                truncate_str(notice, room),
                Style::default().fg(palette::STATUS_YELLOW),
            );
        }

        if !updated.is_empty() && area.width > updated_width {
            buf.set_string(
                area.right() - updated_width,
                area.y,
                &updated,
                styles::text_secondary(),
            );
        }
    }
}
