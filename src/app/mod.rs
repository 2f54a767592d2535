//! Application entry point: error reporting, logging and configuration

use std::path::PathBuf;

use tunwatch_app::config::load_settings;
use tunwatch_core::prelude::*;
use tunwatch_feed::FeedConfig;

use crate::headless;

/// Command-line choices that affect startup
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Overrides `[feed] uri` from the config file
    pub uri: Option<String>,
    /// Explicit config file; must exist when given
    pub config: Option<PathBuf>,
    /// Print NDJSON instead of drawing the dashboard
    pub headless: bool,
}

/// Main application entry point
pub async fn run(options: Options) -> Result<()> {
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;

    // Log to file, since the TUI owns stdout
    tunwatch_core::logging::init()?;

    let config = resolve_feed_config(&options)?;
    info!(
        "Feed {} (retry delays {:?}, tick {:?})",
        config.uri,
        config.schedule.delays(),
        config.tick_interval
    );

    let result = if options.headless {
        headless::run_headless(config).await
    } else {
        tunwatch_tui::run(config).await
    };

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }

    info!("tunwatch exiting");
    result
}

/// Load settings, apply CLI overrides and validate the feed section
pub fn resolve_feed_config(options: &Options) -> Result<FeedConfig> {
    let mut settings = load_settings(options.config.as_deref())?;
    if let Some(uri) = &options.uri {
        settings.feed.uri = uri.clone();
    }
    settings.feed_config()
}
