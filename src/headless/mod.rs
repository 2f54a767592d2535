//! Headless mode - NDJSON feed output
//!
//! Runs only the feed controller and prints one JSON object per line to
//! stdout: a `started` event, one `feed` event per published state change,
//! and a `stopped` event on shutdown.
//!
//! # Example Output
//!
//! ```json
//! {"event":"started","uri":"ws://localhost:4430/stats","timestamp":1704700001000}
//! {"event":"feed","status":"CONNECTING","countdown":null,"display":{"kind":"status_line","text":"connecting..."},"timestamp":1704700001002}
//! {"event":"feed","status":"CONNECTED","countdown":null,"display":{"kind":"waiting","text":"waiting for data"},"timestamp":1704700001010}
//! ```

pub mod runner;

pub use runner::run_headless;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use tunwatch_core::{ConnectionStatus, Display};
use tunwatch_feed::FeedState;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    Started {
        uri: String,
        timestamp: i64,
    },

    /// One feed publication, rendered
    Feed {
        status: ConnectionStatus,
        countdown: Option<u64>,
        display: Display,
        timestamp: i64,
    },

    Stopped {
        timestamp: i64,
    },
}

impl HeadlessEvent {
    pub fn started(uri: &str) -> Self {
        Self::Started {
            uri: uri.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn feed(state: &FeedState) -> Self {
        Self::Feed {
            status: state.status,
            countdown: state.countdown,
            display: state.display(),
            timestamp: Self::now(),
        }
    }

    pub fn stopped() -> Self {
        Self::Stopped {
            timestamp: Self::now(),
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Write this event as one NDJSON line
    pub fn write_to<W: Write>(&self, out: &mut W) -> tunwatch_core::Result<()> {
        let json = serde_json::to_string(self)?;
        writeln!(out, "{}", json)?;
        out.flush()?;
        Ok(())
    }

    /// Write to stdout, logging failures
    pub fn emit(&self) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = self.write_to(&mut stdout) {
            error!("Failed to write headless event to stdout: {}", e);
        }
    }
}
