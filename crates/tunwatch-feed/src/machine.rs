//! Feed lifecycle state machine.
//!
//! [`FeedMachine`] is synchronous and performs no I/O: it is fed the four
//! lifecycle events plus countdown ticks, each stamped with the time at
//! which it was observed, and tells the caller when to open a new socket
//! and when to arm the retry countdown. [`crate::FeedController`] drives it
//! from real sockets and timers.
//!
//! ```text
//!   start() ──▶ CONNECTING ──open──▶ CONNECTED
//!                    │                   │
//!                  close               close
//!                    ▼                   ▼
//!               CLOSEDRECONNECT ◀────────┘
//!                    │  ▲
//!       countdown = 0│  │close
//!                    ▼  │
//!               (new attempt) ──open──▶ CONNECTED
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::Instant;

use tunwatch_core::display::{render, Display};
use tunwatch_core::prelude::*;
use tunwatch_core::{ConnectionStatus, Snapshot};

use crate::schedule::RetrySchedule;
use crate::transport::SocketId;

/// Stand-in deadline for delays that overflow `Instant`, roughly 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Published view of the feed: everything the renderer needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedState {
    pub status: ConnectionStatus,
    /// Most recent snapshot. Cleared when a socket opens.
    pub snapshot: Option<Arc<Snapshot>>,
    /// Seconds until the next attempt while reconnecting.
    pub countdown: Option<u64>,
    /// Local time the current snapshot was received.
    pub received_at: Option<DateTime<Local>>,
}

impl FeedState {
    /// Render this state through the pure view renderer.
    pub fn display(&self) -> Display {
        render(self.status, self.snapshot.as_deref(), self.countdown)
    }
}

/// Connection lifecycle state machine.
#[derive(Debug)]
pub struct FeedMachine {
    schedule: RetrySchedule,
    status: ConnectionStatus,
    snapshot: Option<Arc<Snapshot>>,
    received_at: Option<DateTime<Local>>,
    /// Index into `schedule` for the next close.
    retry_index: usize,
    /// The only socket instance whose events are honored.
    active: Option<SocketId>,
    next_socket: u64,
    /// When the next attempt is due. `Some` only while counting down.
    deadline: Option<Instant>,
    countdown: Option<u64>,
    /// Delay applied by the most recent close.
    last_delay: Option<Duration>,
}

impl FeedMachine {
    pub fn new(schedule: RetrySchedule) -> Self {
        Self {
            schedule,
            status: ConnectionStatus::Connecting,
            snapshot: None,
            received_at: None,
            retry_index: 0,
            active: None,
            next_socket: 0,
            deadline: None,
            countdown: None,
            last_delay: None,
        }
    }

    // ── Lifecycle events ─────────────────────────────────────────────────

    /// Begin the first connection attempt. No delay is applied.
    ///
    /// Returns the socket instance the caller must open.
    pub fn start(&mut self) -> SocketId {
        self.status = ConnectionStatus::Connecting;
        self.deadline = None;
        self.countdown = None;
        info!("Feed: starting");
        self.issue_socket()
    }

    /// The transport completed its handshake.
    ///
    /// Resets the retry index and clears any held snapshot so pre-reconnect
    /// data is never shown as current. Returns `false` for stale sockets.
    pub fn on_open(&mut self, socket: SocketId) -> bool {
        if !self.is_active(socket) {
            debug!("Feed {}: ignoring open from stale socket", socket);
            return false;
        }

        info!("Feed {}: connected", socket);
        self.retry_index = 0;
        self.status = ConnectionStatus::Connected;
        self.snapshot = None;
        self.received_at = None;
        self.deadline = None;
        self.countdown = None;
        true
    }

    /// One inbound text message.
    ///
    /// Returns `Ok(true)` if the snapshot was replaced and `Ok(false)` if the
    /// event was ignored (stale socket or not connected).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSnapshot`] when the payload does not parse.
    /// The status and the previously held snapshot are left untouched.
    pub fn on_message(&mut self, socket: SocketId, payload: &str) -> Result<bool> {
        if !self.is_active(socket) || self.status != ConnectionStatus::Connected {
            debug!("Feed {}: ignoring message from inactive socket", socket);
            return Ok(false);
        }

        let snapshot = Snapshot::parse(payload)?;
        trace!(
            "Feed {}: snapshot with {} connection(s)",
            socket,
            snapshot.connections.len()
        );
        self.snapshot = Some(Arc::new(snapshot));
        self.received_at = Some(Local::now());
        Ok(true)
    }

    /// The socket closed, for any reason.
    ///
    /// Schedules the next attempt at `now + schedule[index]`, advances the
    /// clamped index and enters `ClosedReconnect`. Returns the deadline the
    /// caller must arm the countdown for, or `None` for stale sockets. Any
    /// previously armed countdown is superseded.
    pub fn on_close(&mut self, socket: SocketId, reason: &str, now: Instant) -> Option<Instant> {
        if !self.is_active(socket) {
            debug!("Feed {}: ignoring close from stale socket", socket);
            return None;
        }

        let delay = self.schedule.delay(self.retry_index);
        self.retry_index = self.schedule.advance(self.retry_index);

        let deadline = now
            .checked_add(delay)
            .unwrap_or_else(|| now + FAR_FUTURE);
        self.active = None;
        self.status = ConnectionStatus::ClosedReconnect;
        self.deadline = Some(deadline);
        self.countdown = Some(deadline.saturating_duration_since(now).as_secs());
        self.last_delay = Some(delay);

        warn!(
            "Feed {}: closed ({}), reconnecting in {}s",
            socket,
            reason,
            delay.as_secs()
        );
        Some(deadline)
    }

    /// Countdown tick.
    ///
    /// Republishes the remaining whole seconds. When it reaches zero the
    /// countdown stops and the returned socket instance must be opened; the
    /// status is left for the next open/close to change.
    pub fn on_tick(&mut self, now: Instant) -> Option<SocketId> {
        let deadline = self.deadline?;

        let remaining = deadline.saturating_duration_since(now).as_secs();
        self.countdown = Some(remaining);
        if remaining > 0 {
            return None;
        }

        self.deadline = None;
        let socket = self.issue_socket();
        info!("Feed {}: retrying connection", socket);
        Some(socket)
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_deref()
    }

    pub fn countdown(&self) -> Option<u64> {
        self.countdown
    }

    pub fn retry_index(&self) -> usize {
        self.retry_index
    }

    /// True while a countdown is pending.
    pub fn is_counting_down(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn active_socket(&self) -> Option<SocketId> {
        self.active
    }

    pub fn last_delay(&self) -> Option<Duration> {
        self.last_delay
    }

    /// Snapshot of the observable state for publication.
    pub fn state(&self) -> FeedState {
        FeedState {
            status: self.status,
            snapshot: self.snapshot.clone(),
            countdown: self.countdown,
            received_at: self.received_at,
        }
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn is_active(&self, socket: SocketId) -> bool {
        self.active == Some(socket)
    }

    fn issue_socket(&mut self) -> SocketId {
        self.next_socket += 1;
        let socket = SocketId(self.next_socket);
        self.active = Some(socket);
        socket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: &str = r#"{"host":"h","port":1,"connections":[]}"#;
    const ONE: &str = r#"{"host":"h","port":1,"connections":[
        {"id":1,"mode":"listen","host":"x","port":2,"createTime":0,"connections":[]}]}"#;

    fn machine() -> FeedMachine {
        FeedMachine::new(RetrySchedule::default())
    }

    /// Drive the machine to CONNECTED on a fresh socket.
    fn connected(m: &mut FeedMachine) -> SocketId {
        let socket = m.start();
        assert!(m.on_open(socket));
        socket
    }

    /// Close the active socket and run the countdown to the next attempt.
    fn close_and_retry(m: &mut FeedMachine, socket: SocketId, now: Instant) -> (Duration, SocketId) {
        let deadline = m.on_close(socket, "test", now).expect("active socket");
        let delay = deadline - now;
        let next = m.on_tick(deadline).expect("attempt at deadline");
        (delay, next)
    }

    #[test]
    fn test_start_enters_connecting() {
        let mut m = machine();
        let socket = m.start();
        assert_eq!(m.status(), ConnectionStatus::Connecting);
        assert_eq!(m.active_socket(), Some(socket));
        assert!(!m.is_counting_down());
    }

    #[test]
    fn test_open_enters_connected_without_snapshot() {
        let mut m = machine();
        connected(&mut m);
        assert_eq!(m.status(), ConnectionStatus::Connected);
        assert!(m.snapshot().is_none());
        assert_eq!(m.countdown(), None);
    }

    #[test]
    fn test_message_replaces_snapshot() {
        let mut m = machine();
        let socket = connected(&mut m);
        assert!(m.on_message(socket, EMPTY).unwrap());
        assert_eq!(m.snapshot().unwrap().connections.len(), 0);
        assert!(m.on_message(socket, ONE).unwrap());
        assert_eq!(m.snapshot().unwrap().connections.len(), 1);
        assert!(m.state().received_at.is_some());
    }

    #[test]
    fn test_malformed_message_keeps_status_and_snapshot() {
        let mut m = machine();
        let socket = connected(&mut m);
        m.on_message(socket, ONE).unwrap();
        let before = m.state();

        let err = m
            .on_message(socket, r#"{"host":"h","port":1}"#)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot { .. }));
        assert_eq!(m.status(), ConnectionStatus::Connected);
        assert_eq!(m.state(), before);
    }

    #[test]
    fn test_malformed_first_message_leaves_waiting() {
        let mut m = machine();
        let socket = connected(&mut m);
        assert!(m.on_message(socket, "{").is_err());
        assert!(m.snapshot().is_none());
        assert_eq!(m.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_close_retains_snapshot_and_starts_countdown() {
        let mut m = machine();
        let socket = connected(&mut m);
        m.on_message(socket, EMPTY).unwrap();

        let now = Instant::now();
        let deadline = m.on_close(socket, "peer closed", now).unwrap();

        assert_eq!(m.status(), ConnectionStatus::ClosedReconnect);
        assert_eq!(deadline, now + Duration::from_secs(5));
        assert_eq!(m.countdown(), Some(5));
        assert_eq!(m.snapshot().unwrap().host, "h");
        assert_eq!(m.active_socket(), None);
    }

    #[test]
    fn test_open_after_reconnect_clears_snapshot() {
        let mut m = machine();
        let socket = connected(&mut m);
        m.on_message(socket, ONE).unwrap();
        let (_, next) = close_and_retry(&mut m, socket, Instant::now());

        assert!(m.snapshot().is_some());
        assert!(m.on_open(next));
        assert!(m.snapshot().is_none());
        assert_eq!(m.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_close_before_open_reconnects() {
        let mut m = machine();
        let socket = m.start();
        let now = Instant::now();
        assert!(m.on_close(socket, "refused", now).is_some());
        assert_eq!(m.status(), ConnectionStatus::ClosedReconnect);
        assert_eq!(m.last_delay(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_consecutive_closes_follow_clamped_schedule() {
        let mut m = machine();
        let mut socket = m.start();
        let mut now = Instant::now();
        let mut delays = Vec::new();
        for _ in 0..5 {
            let (delay, next) = close_and_retry(&mut m, socket, now);
            delays.push(delay.as_secs());
            now += delay;
            socket = next;
        }
        assert_eq!(delays, vec![5, 5, 5, 10, 10]);
    }

    #[test]
    fn test_open_resets_retry_index() {
        let mut m = machine();
        let mut socket = m.start();
        let mut now = Instant::now();
        for _ in 0..7 {
            let (delay, next) = close_and_retry(&mut m, socket, now);
            now += delay;
            socket = next;
        }
        assert_eq!(m.retry_index(), 3);

        assert!(m.on_open(socket));
        assert_eq!(m.retry_index(), 0);
        let deadline = m.on_close(socket, "again", now).unwrap();
        assert_eq!(deadline - now, Duration::from_secs(5));
    }

    #[test]
    fn test_countdown_is_monotonic_and_ends_at_zero() {
        let mut m = machine();
        let socket = connected(&mut m);
        let start = Instant::now();
        m.on_close(socket, "test", start).unwrap();

        let mut seen = vec![m.countdown().unwrap()];
        let mut attempt = None;
        let mut elapsed = Duration::ZERO;
        while attempt.is_none() {
            elapsed += Duration::from_millis(250);
            attempt = m.on_tick(start + elapsed);
            seen.push(m.countdown().unwrap());
        }

        assert!(seen.windows(2).all(|w| w[0] >= w[1]), "{seen:?}");
        assert_eq!(*seen.last().unwrap(), 0);
        assert_eq!(seen[0], 5);
        assert!(!m.is_counting_down());
    }

    #[test]
    fn test_tick_does_not_change_status() {
        let mut m = machine();
        let socket = connected(&mut m);
        let now = Instant::now();
        let deadline = m.on_close(socket, "test", now).unwrap();
        m.on_tick(deadline).unwrap();
        assert_eq!(m.status(), ConnectionStatus::ClosedReconnect);
        assert_eq!(m.countdown(), Some(0));
    }

    #[test]
    fn test_oversized_delay_does_not_overflow() {
        let mut m = FeedMachine::new(RetrySchedule::from_secs(&[u64::MAX]).unwrap());
        let socket = connected(&mut m);
        let now = Instant::now();

        let deadline = m.on_close(socket, "test", now).unwrap();
        assert_eq!(deadline, now + FAR_FUTURE);
        assert_eq!(m.countdown(), Some(FAR_FUTURE.as_secs()));
        assert_eq!(m.status(), ConnectionStatus::ClosedReconnect);

        assert_eq!(m.on_tick(now + Duration::from_secs(60)), None);
        assert!(m.is_counting_down());
    }

    #[test]
    fn test_one_second_delay_retries_on_first_tick() {
        // Whole seconds remaining drop to 0 one millisecond after the close.
        let mut m = FeedMachine::new(RetrySchedule::from_secs(&[1]).unwrap());
        let socket = connected(&mut m);
        let now = Instant::now();
        m.on_close(socket, "test", now).unwrap();
        assert_eq!(m.countdown(), Some(1));
        assert!(m.on_tick(now + Duration::from_millis(1)).is_some());
    }

    #[test]
    fn test_tick_without_countdown_is_noop() {
        let mut m = machine();
        connected(&mut m);
        assert_eq!(m.on_tick(Instant::now()), None);
        assert_eq!(m.countdown(), None);
    }

    #[test]
    fn test_stale_socket_events_are_ignored() {
        let mut m = machine();
        let old = connected(&mut m);
        m.on_message(old, EMPTY).unwrap();
        let (_, new) = close_and_retry(&mut m, old, Instant::now());
        assert!(m.on_open(new));

        // Late callbacks from the first socket instance.
        assert!(!m.on_message(old, ONE).unwrap());
        assert!(m.on_close(old, "late", Instant::now()).is_none());
        assert!(!m.on_open(old));

        assert_eq!(m.status(), ConnectionStatus::Connected);
        assert_eq!(m.active_socket(), Some(new));
        assert!(m.snapshot().is_none());
    }

    #[test]
    fn test_socket_ids_are_unique() {
        let mut m = machine();
        let first = connected(&mut m);
        let (_, second) = close_and_retry(&mut m, first, Instant::now());
        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn test_state_display_follows_status() {
        let mut m = machine();
        assert!(matches!(m.state().display(), Display::StatusLine { .. }));
        let socket = connected(&mut m);
        assert!(matches!(m.state().display(), Display::Waiting { .. }));
        m.on_message(socket, ONE).unwrap();
        assert_eq!(m.state().display().rows().len(), 1);
    }
}
