//! Externally observable state of the live feed

use std::fmt;

use serde::{Deserialize, Serialize};

/// Current state of the feed connection.
///
/// Exactly one value is current at any time. `FailedReconnect` is rendered
/// but no transport event produces it: the transport reports handshake
/// failures and closes identically, and both drive `ClosedReconnect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectionStatus {
    /// First connection attempt in flight.
    #[default]
    Connecting,
    /// Transport handshake completed; snapshots are flowing.
    Connected,
    /// Socket closed, retry scheduled.
    ClosedReconnect,
    /// Reserved for an explicit connect failure signal.
    FailedReconnect,
}

impl ConnectionStatus {
    /// Wire/log label (`CONNECTING`, `CONNECTED`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "CONNECTING",
            ConnectionStatus::Connected => "CONNECTED",
            ConnectionStatus::ClosedReconnect => "CLOSEDRECONNECT",
            ConnectionStatus::FailedReconnect => "FAILEDRECONNECT",
        }
    }

    /// True while a retry countdown is meaningful for display.
    pub fn is_reconnecting(&self) -> bool {
        matches!(
            self,
            ConnectionStatus::ClosedReconnect | ConnectionStatus::FailedReconnect
        )
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
