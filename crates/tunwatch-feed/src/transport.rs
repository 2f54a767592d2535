//! Transport seam for the live feed.
//!
//! A [`Connector`] opens one socket instance and reports its lifecycle as
//! [`TransportEvent`]s on a single queue. Every event carries the
//! [`SocketId`] of the instance that produced it, so the controller can
//! drop callbacks from sockets it has already moved past.

use std::fmt;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use tunwatch_core::prelude::*;

/// Identity of one socket instance. Never reused within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketId(pub u64);

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle callback from the socket layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEventKind {
    /// Handshake completed.
    Opened,
    /// One inbound text frame.
    Text(String),
    /// The socket ended for any reason. Sent at most once per instance.
    Closed { reason: String },
}

/// A [`TransportEventKind`] bound to the socket instance that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    pub socket: SocketId,
    pub kind: TransportEventKind,
}

impl TransportEvent {
    pub fn new(socket: SocketId, kind: TransportEventKind) -> Self {
        Self { socket, kind }
    }
}

/// Exclusive handle to a running socket task.
///
/// Dropping the handle aborts the task, which tears the socket down without
/// emitting further events.
pub struct SocketHandle {
    socket: SocketId,
    task: Option<JoinHandle<()>>,
}

impl SocketHandle {
    pub fn new(socket: SocketId, task: JoinHandle<()>) -> Self {
        Self {
            socket,
            task: Some(task),
        }
    }

    /// Handle with no backing task, for connectors that drive events themselves.
    pub fn detached(socket: SocketId) -> Self {
        Self { socket, task: None }
    }
}

impl fmt::Debug for SocketHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketHandle")
            .field("socket", &self.socket)
            .field("has_task", &self.task.is_some())
            .finish()
    }
}

impl Drop for SocketHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Opens socket instances for the feed controller.
pub trait Connector: Send + Sync + 'static {
    /// Begin connecting to `uri` as instance `socket`.
    ///
    /// Must not block. Lifecycle events are delivered on `events`; a
    /// handshake failure is reported as `Closed`, exactly like a close after
    /// a successful open.
    fn open(&self, uri: &str, socket: SocketId, events: mpsc::Sender<TransportEvent>)
        -> SocketHandle;
}

/// [`Connector`] backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn open(
        &self,
        uri: &str,
        socket: SocketId,
        events: mpsc::Sender<TransportEvent>,
    ) -> SocketHandle {
        let task = tokio::spawn(run_socket(uri.to_string(), socket, events));
        SocketHandle::new(socket, task)
    }
}

/// Drive one WebSocket instance from handshake to close.
async fn run_socket(uri: String, socket: SocketId, events: mpsc::Sender<TransportEvent>) {
    debug!("Feed {}: connecting to {}", socket, uri);

    let ws_stream = match connect_async(uri.as_str()).await {
        Ok((ws_stream, _response)) => ws_stream,
        Err(err) => {
            let reason = Error::transport(format!("connect to {uri} failed: {err}"));
            emit(&events, socket, TransportEventKind::Closed {
                reason: reason.to_string(),
            })
            .await;
            return;
        }
    };

    if !emit(&events, socket, TransportEventKind::Opened).await {
        return;
    }

    // Nothing is ever sent to the server, so the sink half is unused.
    let (_ws_sink, mut ws_stream) = ws_stream.split();

    let reason = loop {
        match ws_stream.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                let kind = TransportEventKind::Text(text.as_str().to_string());
                if !emit(&events, socket, kind).await {
                    return;
                }
            }
            Some(Ok(WsMessage::Close(frame))) => {
                break match frame {
                    Some(frame) => format!(
                        "close frame: {} {}",
                        u16::from(frame.code),
                        frame.reason.as_str()
                    ),
                    None => "close frame".to_string(),
                };
            }
            Some(Ok(_)) => {
                // Ping/Pong/Binary are ignored
            }
            Some(Err(err)) => break format!("read error: {err}"),
            None => break "stream ended".to_string(),
        }
    };

    emit(&events, socket, TransportEventKind::Closed { reason }).await;
}

/// Send one event; returns `false` when the controller has gone away.
async fn emit(
    events: &mpsc::Sender<TransportEvent>,
    socket: SocketId,
    kind: TransportEventKind,
) -> bool {
    if events.send(TransportEvent::new(socket, kind)).await.is_err() {
        debug!("Feed {}: event queue closed, dropping socket", socket);
        return false;
    }
    true
}
