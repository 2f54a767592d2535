//! tunwatch - live status dashboard for a WebSocket tunnel server
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use tunwatch::Options;
use tunwatch_core::Result;

/// tunwatch - live status dashboard for a WebSocket tunnel server
#[derive(Parser, Debug)]
#[command(name = "tunwatch", version)]
#[command(about = "Live status dashboard for a WebSocket tunnel server", long_about = None)]
struct Args {
    /// Status feed URI (overrides the config file)
    #[arg(long, value_name = "URI")]
    uri: Option<String>,

    /// Path to config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run in headless mode (NDJSON output, no TUI)
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tunwatch::run(Options {
        uri: args.uri,
        config: args.config,
        headless: args.headless,
    })
    .await
}
