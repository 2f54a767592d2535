//! tunwatch-tui - Terminal UI for tunwatch
//!
//! Ratatui front-end over the [`tunwatch_app`] state: event polling, the
//! view function and the dashboard widgets. [`run`] wires the live feed
//! controller into the event loop.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use runner::run;
