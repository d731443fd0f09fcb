//! Dynamic log level reloading support

use cefboot_core::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use thiserror::Error;
use tracing_subscriber::Registry;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::reload;

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("logging has not been initialized")]
    NotInitialized,

    #[error("failed to reload level filter: {0}")]
    Reload(#[from] reload::Error),
}

/// Handle for changing the level filter installed by [`init_logging`](crate::init_logging)
pub struct ReloadHandle {
    handle: Mutex<Option<reload::Handle<LevelFilter, Registry>>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Get the global reload handle
    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    pub fn set_handle(&self, handle: reload::Handle<LevelFilter, Registry>) {
        *self.handle.lock() = Some(handle);
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Reload the filter to use a new log level
    ///
    /// Also updates the level forwarded to the global log sink.
    pub fn reload_level(&self, level: LogLevel) -> Result<(), ReloadError> {
        let guard = self.handle.lock();
        let handle = guard.as_ref().ok_or(ReloadError::NotInitialized)?;
        handle.reload(level_filter(level))?;
        crate::LogSinkManager::global().set_level(level);
        Ok(())
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}

#[cfg(test)]
#[path = "reload/reload_tests.rs"]
mod reload_tests;
