//! Host log sink management

use cefboot_core::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Receives log events forwarded by the [`SinkLayer`](crate::SinkLayer)
///
/// Arguments are the level, the target (module path) and the formatted
/// message including structured fields.
pub type LogSink = Arc<dyn Fn(LogLevel, &str, &str) + Send + Sync>;

static SINK_MANAGER: OnceCell<LogSinkManager> = OnceCell::new();

/// Holds the host's log sink and the level it receives
pub struct LogSinkManager {
    sink: RwLock<Option<LogSink>>,
    level: AtomicU8,
}

impl LogSinkManager {
    pub fn new() -> Self {
        Self {
            sink: RwLock::new(None),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Get the global sink manager instance
    pub fn global() -> &'static LogSinkManager {
        SINK_MANAGER.get_or_init(LogSinkManager::new)
    }

    /// Install or remove the sink
    pub fn set_sink(&self, sink: Option<LogSink>) {
        *self.sink.write() = sink;
    }

    pub fn has_sink(&self) -> bool {
        self.sink.read().is_some()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::SeqCst))
    }

    /// Check if a log level is enabled
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level()
    }

    /// Forward a message to the sink if one is set and `level` is enabled
    pub fn log(&self, level: LogLevel, target: &str, message: &str) {
        if !self.is_enabled(level) {
            return;
        }
        // Clone out of the lock so a sink may log or replace itself
        let sink = self.sink.read().clone();
        if let Some(sink) = sink {
            sink(level, target, message);
        }
    }
}

impl Default for LogSinkManager {
    fn default() -> Self {
        Self::new()
    }
}
