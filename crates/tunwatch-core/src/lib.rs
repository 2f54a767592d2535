//! # tunwatch-core - Core Domain Types
//!
//! Foundation crate for tunwatch. Provides the feed status, the snapshot
//! payload types, the pure view renderer, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Status (`status`)
//! - [`ConnectionStatus`] - Externally observable feed state
//!
//! ### Snapshot (`snapshot`)
//! - [`Snapshot`] - One point-in-time report of the tunnel server
//! - [`TunnelConnection`], [`ForwardedSocket`] - Nested records
//!
//! ### Display (`display`)
//! - [`render()`] - Pure mapping from status + snapshot to a [`Display`]
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! ```rust
//! use tunwatch_core::prelude::*;
//! ```

pub mod display;
pub mod error;
pub mod logging;
pub mod snapshot;
pub mod status;

/// Prelude for common imports used throughout all tunwatch crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use display::{render, Display, DisplayRow};
pub use error::{Error, Result, ResultExt};
pub use snapshot::{CreateTime, EntityId, ForwardedSocket, Snapshot, TunnelConnection};
pub use status::ConnectionStatus;
