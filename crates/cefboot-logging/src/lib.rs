//! cefboot-logging - Tracing setup for cefboot
//!
//! This crate provides:
//! - [`init_logging`] installing a `tracing-subscriber` stack
//! - [`SinkLayer`] forwarding events to a host-supplied [`LogSink`]
//! - [`ReloadHandle`] for changing the level at runtime

mod layer;
mod reload;
mod sink;

pub use cefboot_core::LogLevel;
pub use layer::{SinkLayer, init_logging};
pub use reload::{ReloadError, ReloadHandle};
pub use sink::{LogSink, LogSinkManager};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogLevel, LogSink, LogSinkManager, ReloadHandle, SinkLayer, init_logging};
}
