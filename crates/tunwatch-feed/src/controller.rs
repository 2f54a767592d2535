//! Async feed controller.
//!
//! The [`FeedController`] owns the live socket handle and the retry
//! countdown timer, feeds transport events into the [`FeedMachine`] one at a
//! time, and publishes every observable change on a `watch` channel.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       FeedController                          │
//! │                                                               │
//! │  Connector ──TransportEvent──▶ events queue ──▶ FeedMachine   │
//! │     ▲          (socket-bound)                      │          │
//! │     │ open(SocketId)                               │          │
//! │     └───────────── countdown tick ◀── Interval ◀───┘          │
//! │                                                    │          │
//! │                         watch::Sender<FeedState> ◀─┘          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use tunwatch_core::prelude::*;

use crate::machine::{FeedMachine, FeedState};
use crate::schedule::RetrySchedule;
use crate::transport::{Connector, SocketHandle, SocketId, TransportEvent, TransportEventKind, WsConnector};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Status socket of a tunnel server on the local machine.
pub const DEFAULT_URI: &str = "ws://localhost:4430/stats";

/// Countdown display/trigger tick.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Capacity of the transport event queue.
const EVENT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// FeedConfig
// ---------------------------------------------------------------------------

/// Construction-time configuration of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub uri: String,
    pub schedule: RetrySchedule,
    pub tick_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            schedule: RetrySchedule::default(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

// ---------------------------------------------------------------------------
// FeedController
// ---------------------------------------------------------------------------

/// Drives the feed lifecycle against a real [`Connector`].
///
/// The socket handle and the countdown are private: the only way to mutate
/// the feed is through transport events and ticks processed by [`run`].
///
/// [`run`]: FeedController::run
pub struct FeedController<C: Connector = WsConnector> {
    uri: String,
    tick_interval: Duration,
    machine: FeedMachine,
    connector: C,
    /// The single live socket instance, if any.
    socket: Option<SocketHandle>,
    /// The single pending countdown, if any. Replacing it drops the old one.
    countdown: Option<Interval>,
    events_tx: mpsc::Sender<TransportEvent>,
    events_rx: mpsc::Receiver<TransportEvent>,
    publisher: watch::Sender<FeedState>,
}

impl<C: Connector> FeedController<C> {
    /// Create a controller and a receiver for its published state.
    pub fn new(config: FeedConfig, connector: C) -> (Self, watch::Receiver<FeedState>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let machine = FeedMachine::new(config.schedule);
        let (publisher, state_rx) = watch::channel(machine.state());

        let controller = Self {
            uri: config.uri,
            tick_interval: config.tick_interval,
            machine,
            connector,
            socket: None,
            countdown: None,
            events_tx,
            events_rx,
            publisher,
        };
        (controller, state_rx)
    }

    /// Run on a background task until `shutdown` flips to `true` or its
    /// sender is dropped.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Start the feed and process events in arrival order.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Feed: connecting to {}", self.uri);
        let socket = self.machine.start();
        self.connect(socket);
        self.publish();

        loop {
            tokio::select! {
                event = self.events_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        // Unreachable while we hold `events_tx`.
                        None => break,
                    }
                }

                _ = next_tick(&mut self.countdown) => {
                    self.handle_tick();
                }

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Feed: shutdown requested");
                        break;
                    }
                }
            }
        }

        self.countdown = None;
        self.socket = None;
        debug!("Feed controller exiting");
    }

    fn handle_event(&mut self, event: TransportEvent) {
        let TransportEvent { socket, kind } = event;
        let changed = match kind {
            TransportEventKind::Opened => self.machine.on_open(socket),
            TransportEventKind::Text(payload) => {
                match self.machine.on_message(socket, &payload) {
                    Ok(changed) => changed,
                    Err(err) => {
                        warn!("Feed {}: dropping message: {}", socket, err);
                        false
                    }
                }
            }
            TransportEventKind::Closed { reason } => {
                match self.machine.on_close(socket, &reason, Instant::now()) {
                    Some(_deadline) => {
                        self.socket = None;
                        self.arm_countdown();
                        true
                    }
                    None => false,
                }
            }
        };

        if changed {
            self.publish();
        }
    }

    fn handle_tick(&mut self) {
        if let Some(socket) = self.machine.on_tick(Instant::now()) {
            self.countdown = None;
            self.connect(socket);
        } else if !self.machine.is_counting_down() {
            self.countdown = None;
        }
        self.publish();
    }

    /// Arm the countdown, superseding any pending one.
    fn arm_countdown(&mut self) {
        let mut interval = time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.countdown = Some(interval);
    }

    /// Open `socket`, dropping any previous instance first.
    fn connect(&mut self, socket: SocketId) {
        self.socket = None;
        self.socket = Some(
            self.connector
                .open(&self.uri, socket, self.events_tx.clone()),
        );
    }

    /// Publish the machine state if it differs from the last publication.
    fn publish(&self) {
        let next = self.machine.state();
        self.publisher.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Resolve on the next countdown tick, or never when no countdown is armed.
async fn next_tick(countdown: &mut Option<Interval>) -> Instant {
    match countdown {
        Some(interval) => interval.tick().await,
        None => std::future::pending().await,
    }
}
