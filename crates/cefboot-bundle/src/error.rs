//! Error types for bundle operations.

use cefboot_core::BootstrapError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during bundle operations.
#[derive(Debug, Error)]
pub enum BundleError {
    /// I/O error outside the archive stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading the archive stream or writing an entry failed.
    #[error("Extraction failed: {source}")]
    Extraction {
        #[source]
        source: std::io::Error,
    },

    /// The installation directory could not be created.
    #[error("Cannot create installation directory {}: {source}", path.display())]
    InstallDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An archive entry would land outside the destination.
    #[error("Unsafe entry path: {0}")]
    UnsafeEntryPath(String),

    /// A named resource does not exist.
    #[error("Missing resource: {0}")]
    MissingResource(String),

    /// The release-tag resource is empty.
    #[error("Invalid release tag: {0}")]
    InvalidReleaseTag(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BundleError {
    /// Returns a stable numeric code for this error.
    ///
    /// The code is the one of the [`BootstrapError`] this error converts into.
    pub fn error_code(&self) -> u32 {
        match self {
            BundleError::InstallDirectory { .. } => 2,
            BundleError::Extraction { .. } => 3,
            BundleError::UnsafeEntryPath(_) => 4,
            BundleError::MissingResource(_) => 5,
            BundleError::InvalidReleaseTag(_) => 5,
            BundleError::Json(_) => 8,
            BundleError::Io(_) => 11,
        }
    }

    pub(crate) fn extraction(source: std::io::Error) -> Self {
        BundleError::Extraction { source }
    }
}

impl From<BundleError> for BootstrapError {
    fn from(err: BundleError) -> Self {
        match err {
            BundleError::Io(source) => BootstrapError::Io(source),
            BundleError::Extraction { source } => BootstrapError::Extraction { source },
            BundleError::InstallDirectory { path, source } => {
                BootstrapError::InstallDirectory { path, source }
            }
            BundleError::UnsafeEntryPath(path) => BootstrapError::UnsafeEntryPath(path),
            BundleError::MissingResource(name) => BootstrapError::MissingResource(name),
            BundleError::InvalidReleaseTag(msg) => {
                BootstrapError::MissingResource(format!("release tag: {msg}"))
            }
            BundleError::Json(err) => BootstrapError::SerializationError(err.to_string()),
        }
    }
}
