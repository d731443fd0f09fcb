//! # cefboot
//!
//! Locates the Chromium Embedded Framework bundle built for the running
//! platform, extracts it into an installation directory and starts the
//! native runtime exactly once.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cefboot::prelude::*;
//! use std::sync::Arc;
//!
//! init_logging(LogLevel::Info);
//!
//! let config = BootstrapConfig::new()
//!     .with_install_dir("jcef-bundle")
//!     .add_args(["--disable-gpu", "--mute-audio"]);
//! let coordinator = BootstrapCoordinator::new(
//!     config,
//!     Arc::new(DirectoryResources::new("resources")),
//!     NativeLibraryInitializer::new("cefboot_native"),
//! );
//!
//! let runtime = coordinator.build()?;
//! let _guard = runtime.disposer.guard();
//! # Ok::<(), BootstrapError>(())
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`cefboot_core`] - Platform resolution, configuration and errors
//! - [`cefboot_bundle`] - Resource sources, archive extraction and install checks
//! - [`cefboot_runtime`] - The build-once coordinator and native initializer
//! - [`cefboot_logging`] - Tracing setup and log forwarding

// Re-export core types
pub use cefboot_core::{
    Architecture, BootstrapConfig, BootstrapError, BootstrapResult, BuildState,
    DEFAULT_INSTALL_DIR, InstallPolicy, LogLevel, OperatingSystem, PlatformId, RuntimeSettings,
};

// Re-export bundle handling
pub use cefboot_bundle::{
    ArchiveExtractor, BundleDescriptor, BundleError, BundleLoader, BundleNaming,
    DirectoryResources, EmbeddedResources, ExtractionSummary, InstallOutcome, MARKER_FILE,
    ResourceSource,
};

// Re-export the runtime
pub use cefboot_runtime::{
    BootstrapCoordinator, Bootstrapped, DisposeGuard, Disposer, FnInitializer, Initializer,
    NativeLibraryInitializer, NativeRuntime, RuntimeHandle,
};

// Re-export logging
pub use cefboot_logging::{LogSink, LogSinkManager, ReloadHandle, init_logging};

// Re-export common dependencies that hosts need
pub use serde_json;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use cefboot::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        BootstrapConfig, BootstrapCoordinator, BootstrapError, BootstrapResult, Bootstrapped,
        DirectoryResources, EmbeddedResources, Initializer, LogLevel, NativeLibraryInitializer,
        PlatformId, RuntimeHandle, RuntimeSettings, init_logging,
    };
}
