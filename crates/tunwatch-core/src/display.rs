//! Pure view renderer.
//!
//! [`render`] maps the feed status and the latest snapshot into a
//! framework-independent [`Display`]. It has no side effects and no state;
//! the terminal widgets and the headless printer both consume its output.

use serde::Serialize;

use crate::snapshot::{CreateTime, EntityId, Snapshot};
use crate::status::ConnectionStatus;

/// Text shown while connected but before the first snapshot arrives.
pub const WAITING_TEXT: &str = "waiting for data";

/// What the user sees for a given feed state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Display {
    /// Not connected: a single status line.
    StatusLine { text: String },
    /// Connected, no snapshot received yet.
    Waiting { text: String },
    /// Connected with data: server header followed by flattened rows.
    Table {
        header: String,
        rows: Vec<DisplayRow>,
    },
}

/// One row of the flattened connection table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum DisplayRow {
    Connection {
        id: EntityId,
        mode: String,
        host: String,
        port: u16,
        created: CreateTime,
    },
    Forwarded {
        connection_id: EntityId,
        id: EntityId,
        addr: String,
        port: u16,
        created: CreateTime,
        to_socket: u64,
        from_socket: u64,
    },
}

impl DisplayRow {
    /// Id of the tunnel connection this row belongs to.
    pub fn connection_id(&self) -> &EntityId {
        match self {
            DisplayRow::Connection { id, .. } => id,
            DisplayRow::Forwarded { connection_id, .. } => connection_id,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, DisplayRow::Connection { .. })
    }
}

impl Display {
    /// Rows of the table, empty for the line variants.
    pub fn rows(&self) -> &[DisplayRow] {
        match self {
            Display::Table { rows, .. } => rows,
            _ => &[],
        }
    }
}

/// Status line text for a non-connected state.
pub fn status_text(status: ConnectionStatus, countdown: Option<u64>) -> String {
    let secs = countdown.unwrap_or(0);
    match status {
        ConnectionStatus::Connecting => "connecting...".to_string(),
        ConnectionStatus::Connected => "connected".to_string(),
        ConnectionStatus::ClosedReconnect => {
            format!("connection closed, reconnecting in {secs}s")
        }
        ConnectionStatus::FailedReconnect => {
            format!("connection failed, reconnecting in {secs}s")
        }
    }
}

/// Map `(status, snapshot, countdown)` to a [`Display`].
///
/// Row order is snapshot order: each connection row is immediately followed
/// by the rows of its forwarded sockets. Nothing is sorted.
pub fn render(
    status: ConnectionStatus,
    snapshot: Option<&Snapshot>,
    countdown: Option<u64>,
) -> Display {
    if status != ConnectionStatus::Connected {
        return Display::StatusLine {
            text: status_text(status, countdown),
        };
    }

    let Some(snapshot) = snapshot else {
        return Display::Waiting {
            text: WAITING_TEXT.to_string(),
        };
    };

    let mut rows = Vec::with_capacity(snapshot.row_count());
    for conn in &snapshot.connections {
        rows.push(DisplayRow::Connection {
            id: conn.id.clone(),
            mode: conn.mode.clone(),
            host: conn.host.clone(),
            port: conn.port,
            created: conn.create_time.clone(),
        });
        rows.extend(conn.connections.iter().map(|fwd| DisplayRow::Forwarded {
            connection_id: conn.id.clone(),
            id: fwd.id.clone(),
            addr: fwd.addr.clone(),
            port: fwd.port,
            created: fwd.create_time.clone(),
            to_socket: fwd.to_socket,
            from_socket: fwd.from_socket,
        }));
    }

    Display::Table {
        header: format!(
            "tunnel server listening on {}:{}",
            snapshot.host, snapshot.port
        ),
        rows,
    }
}
