//! Dashboard widgets

mod connection_table;
mod footer;
mod header;
mod message_panel;

pub use connection_table::ConnectionTable;
pub use footer::Footer;
pub use header::Header;
pub use message_panel::MessagePanel;

use chrono::{DateTime, Local};
use tunwatch_core::CreateTime;

/// Truncate a string to at most `max_chars` Unicode characters.
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return "";
    }
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Human-readable creation time. Epoch values are shown in local time,
/// preformatted text is shown verbatim.
pub(crate) fn format_created(created: &CreateTime) -> String {
    match created {
        CreateTime::Epoch(secs) => DateTime::from_timestamp(secs.trunc() as i64, 0)
            .map(|utc| {
                utc.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| created.to_string()),
        CreateTime::Text(text) => text.clone(),
    }
}
