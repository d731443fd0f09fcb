//! Native bundle handling for cefboot
//!
//! A bundle set is a collection of read-only resources: one `.tar.gz`
//! archive per supported platform plus a resource holding the release tag
//! shared by all of them.
//!
//! ```text
//! resources/
//! ├── jcef-release-tag
//! ├── jcef-natives-linux-amd64-<tag>.tar.gz
//! ├── jcef-natives-macosx-arm64-<tag>.tar.gz
//! └── jcef-natives-windows-amd64-<tag>.tar.gz
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cefboot_bundle::{BundleLoader, DirectoryResources};
//! use cefboot_core::PlatformId;
//! use std::path::Path;
//!
//! let loader = BundleLoader::new(DirectoryResources::new("resources"));
//! let outcome = loader.install(PlatformId::current()?, Path::new("jcef-bundle"))?;
//! println!("{} (extracted: {})", outcome.descriptor(), outcome.was_extracted());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod descriptor;
mod error;
mod resource;

pub mod extract;
pub mod install;
pub mod loader;

pub use descriptor::{BundleDescriptor, BundleNaming};
pub use error::BundleError;
pub use extract::{ArchiveExtractor, BUFFER_SIZE, ExtractionSummary};
pub use install::{AlwaysExtract, InstallCheck, InstallMarker, MARKER_FILE, MarkerFile};
pub use loader::{BundleLoader, InstallOutcome};
pub use resource::{DirectoryResources, EmbeddedResources, ResourceSource};

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// File extension of platform archives.
pub const ARCHIVE_EXTENSION: &str = "tar.gz";
