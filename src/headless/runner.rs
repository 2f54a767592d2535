//! Headless mode runner - feed loop without TUI

use tokio::sync::watch;
use tracing::{error, info};

use tunwatch_app::signals;
use tunwatch_core::prelude::Result;
use tunwatch_feed::{FeedConfig, FeedController, WsConnector};

use super::HeadlessEvent;

/// Run in headless mode until SIGINT/SIGTERM
pub async fn run_headless(config: FeedConfig) -> Result<()> {
    info!("tunwatch starting in HEADLESS mode");

    let uri = config.uri.clone();
    let (controller, mut feed_rx) = FeedController::new(config, WsConnector);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let feed_task = controller.spawn(shutdown_rx);

    HeadlessEvent::started(&uri).emit();
    let initial = feed_rx.borrow_and_update().clone();
    HeadlessEvent::feed(&initial).emit();

    let signal = signals::wait_for_signal();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            changed = feed_rx.changed() => {
                if changed.is_err() {
                    info!("Feed controller stopped");
                    break;
                }
                let state = feed_rx.borrow_and_update().clone();
                HeadlessEvent::feed(&state).emit();
            }

            result = &mut signal => {
                if let Err(e) = result {
                    error!("Signal handler error: {}", e);
                }
                info!("Shutdown signal received");
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = feed_task.await {
        error!("Feed task ended abnormally: {}", e);
    }

    HeadlessEvent::stopped().emit();
    Ok(())
}
