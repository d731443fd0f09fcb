//! Error types for cefboot

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for bootstrap operations
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Error type for bootstrap operations
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The OS/architecture strings did not match a supported platform
    #[error("could not determine platform for os.name={os_name} and os.arch={os_arch}")]
    UnsupportedPlatform { os_name: String, os_arch: String },

    /// The installation directory could not be created
    #[error("cannot create installation directory {}: {source}", path.display())]
    InstallDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the bundle archive failed
    #[error("extraction failed: {source}")]
    Extraction {
        #[source]
        source: std::io::Error,
    },

    /// An archive entry tried to escape the installation directory
    #[error("unsafe archive entry path: {0}")]
    UnsafeEntryPath(String),

    /// A bundle resource could not be found
    #[error("missing resource: {0}")]
    MissingResource(String),

    /// The native runtime rejected its configuration
    #[error("initialization failed: {0}")]
    InitializationFailed(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Waiting for another thread's build exceeded the configured timeout
    #[error("timed out after {0:?} waiting for a concurrent build")]
    WaitTimeout(Duration),

    /// A build attempt failed. Every caller of that attempt shares the cause.
    #[error("bootstrap build failed: {0}")]
    BuildFailed(Arc<BootstrapError>),

    /// Other I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BootstrapError {
    /// Returns a stable numeric code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            BootstrapError::UnsupportedPlatform { .. } => 1,
            BootstrapError::InstallDirectory { .. } => 2,
            BootstrapError::Extraction { .. } => 3,
            BootstrapError::UnsafeEntryPath(_) => 4,
            BootstrapError::MissingResource(_) => 5,
            BootstrapError::InitializationFailed(_) => 6,
            BootstrapError::ConfigError(_) => 7,
            BootstrapError::SerializationError(_) => 8,
            BootstrapError::WaitTimeout(_) => 9,
            BootstrapError::BuildFailed(_) => 10,
            BootstrapError::Io(_) => 11,
        }
    }

    /// The error that actually caused the failure.
    ///
    /// For [`BootstrapError::BuildFailed`] this is the error raised by the build itself.
    pub fn root(&self) -> &BootstrapError {
        match self {
            BootstrapError::BuildFailed(cause) => cause.root(),
            other => other,
        }
    }

    /// Whether the failure came from the filesystem or archive stream
    pub fn is_io(&self) -> bool {
        matches!(
            self.root(),
            BootstrapError::InstallDirectory { .. }
                | BootstrapError::Extraction { .. }
                | BootstrapError::Io(_)
        )
    }
}

impl From<serde_json::Error> for BootstrapError {
    fn from(err: serde_json::Error) -> Self {
        BootstrapError::SerializationError(err.to_string())
    }
}


#[cfg(test)]
#[path = "error/error_parameterized_tests.rs"]
mod error_parameterized_tests;
