//! Header bar: app title, feed URI and status badge

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use tunwatch_core::ConnectionStatus;

use crate::theme::styles;

use super::truncate_str;

const TITLE: &str = " tunwatch ";

pub struct Header<'a> {
    uri: &'a str,
    status: ConnectionStatus,
    countdown: Option<u64>,
}

impl<'a> Header<'a> {
    pub fn new(uri: &'a str, status: ConnectionStatus, countdown: Option<u64>) -> Self {
        Self {
            uri,
            status,
            countdown,
        }
    }

    fn badge(&self) -> String {
        match self.countdown {
            Some(secs) if self.status.is_reconnecting() => {
                format!(" {} {}s ", self.status.label(), secs)
            }
            _ => format!(" {} ", self.status.label()),
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let badge = self.badge();
        let badge_width = badge.chars().count() as u16;
        let title_width = TITLE.len() as u16;

        buf.set_stringn(area.x, area.y, TITLE, area.width as usize, styles::accent_bold());

        // URI fills whatever is left between title and badge.
        let uri_x = area.x + title_width.min(area.width);
        let uri_room = area
            .width
            .saturating_sub(title_width)
            .saturating_sub(badge_width + 1) as usize;
        buf.set_string(
            uri_x,
            area.y,
            truncate_str(self.uri, uri_room),
            styles::text_secondary(),
        );

        if area.width >= title_width + badge_width {
            buf.set_string(
                area.right() - badge_width,
                area.y,
                &badge,
                styles::status_style(self.status),
            );
        }
    }
}
