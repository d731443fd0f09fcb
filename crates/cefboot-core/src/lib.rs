//! cefboot-core - Core types, platform resolution and configuration
//!
//! This crate provides the foundational types shared by the cefboot crates:
//! - [`PlatformId`] and [`PlatformId::resolve`] for mapping raw OS/architecture strings
//! - [`BootstrapConfig`] and [`RuntimeSettings`] for configuring a bootstrap
//! - [`BuildState`] for the build-once state machine
//! - [`BootstrapError`] for error handling

mod config;
mod error;
mod platform;
mod state;

pub use config::{BootstrapConfig, InstallPolicy, RuntimeSettings, DEFAULT_INSTALL_DIR};
pub use error::{BootstrapError, BootstrapResult};
pub use platform::{Architecture, OperatingSystem, PlatformId};
pub use state::BuildState;

/// Log levels shared by the logging crate and the runtime settings
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }

    /// Parse a level name such as `"info"` or `"WARN"`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" | "none" => Some(LogLevel::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Architecture, BootstrapConfig, BootstrapError, BootstrapResult, BuildState,
        InstallPolicy, LogLevel, OperatingSystem, PlatformId, RuntimeSettings,
    };
}
