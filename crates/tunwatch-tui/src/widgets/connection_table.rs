//! # Connection Table Widget
//!
//! Renders the flattened snapshot: each tunnel connection row is followed
//! by the forwarded sockets it carries. Forwarded rows show the byte
//! counters on either side of the local socket.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;
use tunwatch_core::DisplayRow;

use crate::theme::{palette, styles};

use super::{format_created, truncate_str};

// ── Column widths (characters) ────────────────────────────────────────────────

/// Mode (connection) or id (forwarded), right-aligned.
const COL_ID: u16 = 9;

/// Host (connection) or peer address (forwarded).
const COL_HOST: u16 = 22;

const COL_PORT: u16 = 7;

const COL_CREATED: u16 = 21;

/// Bytes written to the local socket, right-aligned.
const COL_TO: u16 = 10;

const COL_ARROW: u16 = 3;

const COL_SOCKET: u16 = 7;

// From-socket bytes get the remaining space.

const ARROW: &str = "->";
const CLOSE_HINT: &str = "[c] close";

// ── ConnectionTable ───────────────────────────────────────────────────────────

/// Table of connection and forwarded-socket rows.
///
/// Stateless: the selection comes from the app state and the scroll window
/// is derived from it so the selected row is always visible.
pub struct ConnectionTable<'a> {
    /// Server line shown as the panel title.
    title: &'a str,
    rows: &'a [DisplayRow],
    selected: Option<usize>,
}

impl<'a> ConnectionTable<'a> {
    pub fn new(title: &'a str, rows: &'a [DisplayRow], selected: Option<usize>) -> Self {
        Self {
            title,
            rows,
            selected,
        }
    }
}

impl Widget for ConnectionTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::panel_block().title(format!(" {} ", self.title));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        self.render_column_headers(Rect { height: 1, ..inner }, buf);

        let data_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        if self.rows.is_empty() {
            if data_area.height > 0 {
                buf.set_stringn(
                    data_area.x,
                    data_area.y,
                    "no active connections",
                    data_area.width as usize,
                    styles::text_muted(),
                );
            }
            return;
        }
        self.render_rows(data_area, buf);
    }
}

impl ConnectionTable<'_> {
    // ── Column headers ────────────────────────────────────────────────────────

    fn render_column_headers(&self, area: Rect, buf: &mut Buffer) {
        let style = styles::text_muted().add_modifier(Modifier::BOLD);
        let mut cells = Cells::new(area, buf);

        cells.right("mode/id", COL_ID, style);
        cells.left("host/addr", COL_HOST, style);
        cells.left("port", COL_PORT, style);
        cells.left("created", COL_CREATED, style);
        cells.right("to", COL_TO, style);
        cells.skip(COL_ARROW + COL_SOCKET + COL_ARROW);
        cells.rest("from", style);
    }

    // ── Data rows ─────────────────────────────────────────────────────────────

    fn render_rows(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let visible = area.height as usize;
        let start = scroll_offset(self.selected, visible);
        let end = (start + visible).min(self.rows.len());

        for (line, index) in (start..end).enumerate() {
            let y = area.y + line as u16;
            let is_selected = self.selected == Some(index);
            let row_style = if is_selected {
                styles::selected_row()
            } else {
                Style::default()
            };

            for x in area.x..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_style(row_style).set_char(' ');
                }
            }

            let row_area = Rect { y, height: 1, ..area };
            let mut cells = Cells::new(row_area, buf);
            match &self.rows[index] {
                DisplayRow::Connection {
                    mode,
                    host,
                    port,
                    created,
                    ..
                } => {
                    let mode_style = Style::default()
                        .fg(palette::CONNECTION_MODE)
                        .add_modifier(Modifier::BOLD);
                    cells.right(mode, COL_ID, mode_style.patch(row_style));
                    cells.left(host, COL_HOST, styles::text_primary().patch(row_style));
                    cells.left(&port.to_string(), COL_PORT, styles::text_primary().patch(row_style));
                    cells.left(
                        &format_created(created),
                        COL_CREATED,
                        styles::text_secondary().patch(row_style),
                    );
                    if is_selected {
                        cells.rest(CLOSE_HINT, styles::text_muted().patch(row_style));
                    }
                }
                DisplayRow::Forwarded {
                    id,
                    addr,
                    port,
                    created,
                    to_socket,
                    from_socket,
                    ..
                } => {
                    let bytes = Style::default().fg(palette::BYTES).patch(row_style);
                    let dim = styles::text_muted().patch(row_style);
                    cells.right(&id.to_string(), COL_ID, dim);
                    cells.left(addr, COL_HOST, styles::text_primary().patch(row_style));
                    cells.left(&port.to_string(), COL_PORT, styles::text_primary().patch(row_style));
                    cells.left(
                        &format_created(created),
                        COL_CREATED,
                        styles::text_secondary().patch(row_style),
                    );
                    cells.right(&to_socket.to_string(), COL_TO, bytes);
                    cells.center(ARROW, COL_ARROW, dim);
                    cells.left("socket", COL_SOCKET, styles::text_secondary().patch(row_style));
                    cells.center(ARROW, COL_ARROW, dim);
                    cells.rest(&from_socket.to_string(), bytes);
                }
            }
        }
    }
}

/// First visible row so that `selected` stays inside a window of `visible` rows.
fn scroll_offset(selected: Option<usize>, visible: usize) -> usize {
    match selected {
        Some(index) if visible > 0 && index >= visible => index + 1 - visible,
        _ => 0,
    }
}

// ── Cell cursor ───────────────────────────────────────────────────────────────

/// Left-to-right cursor over one line that never writes past its area.
struct Cells<'b> {
    x: u16,
    y: u16,
    right_edge: u16,
    buf: &'b mut Buffer,
}

impl<'b> Cells<'b> {
    fn new(area: Rect, buf: &'b mut Buffer) -> Self {
        Self {
            x: area.x,
            y: area.y,
            right_edge: area.right(),
            buf,
        }
    }

    /// Room for a column of `width`, leaving one space of padding.
    fn room(&self, width: u16) -> usize {
        width.min(self.right_edge.saturating_sub(self.x)).saturating_sub(1) as usize
    }

    fn left(&mut self, text: &str, width: u16, style: Style) {
        let room = self.room(width);
        self.put(self.x, truncate_str(text, room), style);
        self.skip(width);
    }

    fn right(&mut self, text: &str, width: u16, style: Style) {
        let room = self.room(width);
        let text = truncate_str(text, room);
        let pad = room.saturating_sub(text.chars().count()) as u16;
        self.put(self.x + pad, text, style);
        self.skip(width);
    }

    fn center(&mut self, text: &str, width: u16, style: Style) {
        let room = self.room(width);
        let text = truncate_str(text, room);
        let pad = (room.saturating_sub(text.chars().count()) / 2) as u16;
        self.put(self.x + pad, text, style);
        self.skip(width);
    }

    /// Fill the remainder of the line.
    fn rest(&mut self, text: &str, style: Style) {
        let room = self.right_edge.saturating_sub(self.x) as usize;
        self.put(self.x, truncate_str(text, room), style);
        self.x = self.right_edge;
    }

    fn skip(&mut self, width: u16) {
        self.x = self.x.saturating_add(width).min(self.right_edge);
    }

    fn put(&mut self, x: u16, text: &str, style: Style) {
        if text.is_empty() || x >= self.right_edge {
            return;
        }
        self.buf.set_string(x, self.y, text, style);
    }
}
