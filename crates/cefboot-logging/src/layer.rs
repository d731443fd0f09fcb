//! Tracing layer that forwards events to the host log sink

use crate::reload::{ReloadHandle, level_filter};
use crate::sink::LogSinkManager;
use cefboot_core::LogLevel;
use std::fmt::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Tracing layer that forwards log events to a [`LogSinkManager`]
pub struct SinkLayer {
    manager: &'static LogSinkManager,
}

impl SinkLayer {
    /// Create a layer using the global sink manager
    pub fn new() -> Self {
        Self {
            manager: LogSinkManager::global(),
        }
    }

    pub fn with_manager(manager: &'static LogSinkManager) -> Self {
        Self { manager }
    }

    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl Default for SinkLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for SinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::convert_level(metadata.level());
        if !self.manager.is_enabled(level) || !self.manager.has_sink() {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.manager
            .log(level, metadata.target(), &visitor.into_message());
    }
}

/// Collects the message and appends structured fields as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn into_message(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Initialize logging at `level`
///
/// Installs a registry with a reloadable level filter, a `fmt` layer writing
/// to stderr and a [`SinkLayer`]. Only the first call installs the
/// subscriber; later calls just change the level.
pub fn init_logging(level: LogLevel) {
    use tracing_subscriber::prelude::*;

    LogSinkManager::global().set_level(level);

    let (filter, handle) = tracing_subscriber::reload::Layer::new(level_filter(level));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(SinkLayer::new());

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        ReloadHandle::global().set_handle(handle);
    } else {
        let _ = ReloadHandle::global().reload_level(level);
    }
}
