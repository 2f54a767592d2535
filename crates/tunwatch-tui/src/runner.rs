//! Main TUI runner - entry point and event loop

use tokio::sync::{mpsc, watch};

use tunwatch_app::message::Message;
use tunwatch_app::process::process_message;
use tunwatch_app::signals;
use tunwatch_app::state::AppState;
use tunwatch_core::prelude::*;
use tunwatch_feed::{FeedConfig, FeedController, FeedState, WsConnector};

use super::{event, render, terminal};

/// Run the dashboard until the user quits or a signal arrives
pub async fn run(config: FeedConfig) -> Result<()> {
    terminal::install_panic_hook();

    let mut state = AppState::new(config.uri.clone());

    let (controller, mut feed_rx) = FeedController::new(config, WsConnector);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let feed_task = controller.spawn(shutdown_rx);

    // Signal handler and any other out-of-band producers
    let (msg_tx, mut msg_rx) = mpsc::channel::<Message>(16);
    signals::spawn_signal_handler(msg_tx);

    let mut term = ratatui::init();
    let result = run_loop(&mut term, &mut state, &mut msg_rx, &mut feed_rx);
    ratatui::restore();

    let _ = shutdown_tx.send(true);
    if let Err(e) = feed_task.await {
        warn!("Feed task ended abnormally: {}", e);
    }

    result
}

/// Main event loop
fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut AppState,
    msg_rx: &mut mpsc::Receiver<Message>,
    feed_rx: &mut watch::Receiver<FeedState>,
) -> Result<()> {
    while !state.should_quit() {
        while let Ok(msg) = msg_rx.try_recv() {
            process_message(state, msg);
        }

        // Only the latest publication matters; intermediate ones are skipped.
        if feed_rx.has_changed().unwrap_or(false) {
            let feed = feed_rx.borrow_and_update().clone();
            process_message(state, Message::Feed(feed));
        }

        terminal.draw(|frame| render::view(frame, state))?;

        if let Some(message) = event::poll()? {
            process_message(state, message);
        }
    }

    Ok(())
}
