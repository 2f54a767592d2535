//! End-to-end feed test against a local WebSocket server.

use std::time::Duration;

use futures_util::SinkExt;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::Message;

use tunwatch_core::ConnectionStatus;
use tunwatch_feed::{FeedConfig, FeedController, FeedState, RetrySchedule, WsConnector};

const SNAPSHOT: &str = r#"{
    "host": "127.0.0.1",
    "port": 4430,
    "connections": [
        {"id": 1, "mode": "listen", "host": "localhost", "port": 8080,
         "createTime": 1700000000,
         "connections": [
            {"id": 2, "addr": "10.0.0.2", "port": 50000, "createTime": 1700000001,
             "toSocket": 10, "fromSocket": 20}
         ]}
    ]
}"#;

const WAIT: Duration = Duration::from_secs(10);

/// Accept connections; each one gets a snapshot and is then closed.
async fn serve(listener: TcpListener, accepted: mpsc::UnboundedSender<()>) {
    while let Ok((stream, _)) = listener.accept().await {
        let accepted = accepted.clone();
        tokio::spawn(async move {
            let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                return;
            };
            let _ = accepted.send(());
            let _ = ws.send(Message::text(SNAPSHOT)).await;
            // Give the client a moment to render before the close arrives.
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = ws.close(None).await;
        });
    }
}

async fn wait_state(
    rx: &mut watch::Receiver<FeedState>,
    what: &str,
    predicate: impl FnMut(&FeedState) -> bool,
) -> FeedState {
    match timeout(WAIT, rx.wait_for(predicate)).await {
        Ok(Ok(state)) => state.clone(),
        Ok(Err(_)) => panic!("feed controller stopped while waiting for {what}"),
        Err(_) => panic!("timed out waiting for {what}"),
    }
}

#[tokio::test]
async fn test_feed_receives_snapshot_and_reconnects() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (accepted_tx, mut accepted_rx) = mpsc::unbounded_channel();
    tokio::spawn(serve(listener, accepted_tx));

    let config = FeedConfig {
        uri: format!("ws://{addr}/stats"),
        schedule: RetrySchedule::from_secs(&[1]).unwrap(),
        tick_interval: Duration::from_millis(50),
    };
    let (controller, mut state) = FeedController::new(config, WsConnector);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = controller.spawn(shutdown_rx);

    let connected = wait_state(&mut state, "snapshot", |s| {
        s.status == ConnectionStatus::Connected && s.snapshot.is_some()
    })
    .await;
    let snapshot = connected.snapshot.unwrap();
    assert_eq!(snapshot.port, 4430);
    assert_eq!(snapshot.row_count(), 2);
    assert!(connected.received_at.is_some());

    let closed = wait_state(&mut state, "close", |s| {
        s.status == ConnectionStatus::ClosedReconnect
    })
    .await;
    assert!(closed.snapshot.is_some(), "snapshot retained after close");
    assert!(closed.countdown.is_some());

    // The retry opens a second connection.
    timeout(WAIT, accepted_rx.recv()).await.unwrap().unwrap();
    timeout(WAIT, accepted_rx.recv()).await.unwrap().unwrap();

    shutdown_tx.send(true).unwrap();
    timeout(WAIT, task).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unreachable_server_keeps_retrying() {
    // Bind then drop to obtain a port with nothing listening.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let config = FeedConfig {
        uri: format!("ws://{addr}/stats"),
        schedule: RetrySchedule::from_secs(&[1]).unwrap(),
        tick_interval: Duration::from_millis(50),
    };
    let (controller, mut state) = FeedController::new(config, WsConnector);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = controller.spawn(shutdown_rx);

    let closed = wait_state(&mut state, "close", |s| {
        s.status == ConnectionStatus::ClosedReconnect
    })
    .await;
    assert!(closed.snapshot.is_none());
    assert_eq!(closed.countdown, Some(1));

    // Countdown reaches zero and a new attempt is made, which fails again.
    wait_state(&mut state, "countdown zero", |s| s.countdown == Some(0)).await;
    wait_state(&mut state, "second close", |s| s.countdown == Some(1)).await;

    drop(shutdown_tx);
    timeout(WAIT, task).await.unwrap().unwrap();
}
