//! Shared helpers for widget and view tests

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

/// Render `widget` into a fresh `w` x `h` buffer
pub fn render_widget<W: Widget>(widget: W, w: u16, h: u16) -> Buffer {
    let area = Rect::new(0, 0, w, h);
    let mut buf = Buffer::empty(area);
    widget.render(area, &mut buf);
    buf
}

/// One string per buffer row
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.y..area.bottom())
        .map(|y| {
            (area.x..area.right())
                .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                .collect()
        })
        .collect()
}

/// Whole buffer as newline-separated text
pub fn buffer_text(buf: &Buffer) -> String {
    buffer_lines(buf).join("\n")
}
