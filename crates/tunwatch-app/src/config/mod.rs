//! Configuration file parsing for tunwatch
//!
//! Settings live in `<config dir>/tunwatch/config.toml`; every field is
//! optional and falls back to the built-in defaults.

pub mod settings;
pub mod types;

pub use settings::{default_config_path, load_settings};
pub use types::*;
