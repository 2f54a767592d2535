//! tunwatch library
//!
//! Startup wiring for the `tunwatch` binary: configuration, logging and the
//! choice between the terminal dashboard and headless NDJSON output.

pub mod app;
pub mod headless;

pub use app::{resolve_feed_config, run, Options};
pub use headless::run_headless;
