//! Bundle installation.
//!
//! The [`BundleLoader`] finds the archive for a platform among the available
//! resources and installs it into a directory unless it is already there.

use crate::install::{self, InstallCheck};
use crate::{
    ArchiveExtractor, BundleDescriptor, BundleError, BundleNaming, BundleResult,
    ExtractionSummary, ResourceSource,
};
use cefboot_core::{BootstrapConfig, InstallPolicy, PlatformId};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Result of [`BundleLoader::install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The install check accepted the existing layout.
    AlreadyInstalled(BundleDescriptor),
    /// The archive was extracted.
    Extracted {
        descriptor: BundleDescriptor,
        summary: ExtractionSummary,
    },
}

impl InstallOutcome {
    #[must_use]
    pub fn descriptor(&self) -> &BundleDescriptor {
        match self {
            InstallOutcome::AlreadyInstalled(descriptor) => descriptor,
            InstallOutcome::Extracted { descriptor, .. } => descriptor,
        }
    }

    #[must_use]
    pub fn was_extracted(&self) -> bool {
        matches!(self, InstallOutcome::Extracted { .. })
    }
}

/// Installs platform bundles from a resource source.
///
/// # Example
///
/// ```no_run
/// use cefboot_bundle::{BundleLoader, DirectoryResources};
/// use cefboot_core::{InstallPolicy, PlatformId};
///
/// let loader = BundleLoader::new(DirectoryResources::new("resources"))
///     .with_install_policy(InstallPolicy::MarkerFile);
/// let outcome = loader.install(PlatformId::current()?, "jcef-bundle".as_ref())?;
/// println!("installed {}", outcome.descriptor());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct BundleLoader {
    resources: Arc<dyn ResourceSource>,
    naming: BundleNaming,
    check: Box<dyn InstallCheck>,
    extractor: ArchiveExtractor,
}

impl BundleLoader {
    /// Create a loader with default naming and the marker-file install check.
    pub fn new(resources: impl ResourceSource + 'static) -> Self {
        Self::from_shared(Arc::new(resources))
    }

    pub fn from_shared(resources: Arc<dyn ResourceSource>) -> Self {
        Self {
            resources,
            naming: BundleNaming::default(),
            check: install::for_policy(InstallPolicy::default()),
            extractor: ArchiveExtractor::new(),
        }
    }

    /// Create a loader using the naming and install policy of `config`.
    pub fn from_config(resources: Arc<dyn ResourceSource>, config: &BootstrapConfig) -> Self {
        Self::from_shared(resources)
            .with_naming(BundleNaming::from_config(config))
            .with_install_policy(config.install_policy)
    }

    pub fn with_naming(mut self, naming: BundleNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_install_policy(mut self, policy: InstallPolicy) -> Self {
        self.check = install::for_policy(policy);
        self
    }

    /// Use a custom install check.
    pub fn with_install_check(mut self, check: impl InstallCheck + 'static) -> Self {
        self.check = Box::new(check);
        self
    }

    pub fn with_extractor(mut self, extractor: ArchiveExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn naming(&self) -> &BundleNaming {
        &self.naming
    }

    /// Identify the bundle for `platform` by reading the release tag.
    pub fn descriptor(&self, platform: PlatformId) -> BundleResult<BundleDescriptor> {
        BundleDescriptor::locate(platform, self.resources.as_ref(), &self.naming)
    }

    /// Check if the resources contain an archive for `platform`.
    pub fn supports_platform(&self, platform: PlatformId) -> bool {
        self.descriptor(platform)
            .map(|d| self.resources.contains(&d.archive_name(&self.naming)))
            .unwrap_or(false)
    }

    /// Install the bundle for `platform` into `install_dir`.
    ///
    /// Skips extraction when the install check accepts the existing layout.
    /// Otherwise creates `install_dir`, extracts the archive and records the
    /// install.
    pub fn install(
        &self,
        platform: PlatformId,
        install_dir: &Path,
    ) -> BundleResult<InstallOutcome> {
        let descriptor = self.descriptor(platform)?;

        if self.check.is_installed(install_dir, &descriptor) {
            info!(%descriptor, install_dir = %install_dir.display(), "Bundle already installed");
            return Ok(InstallOutcome::AlreadyInstalled(descriptor));
        }

        let archive_name = descriptor.archive_name(&self.naming);
        let archive = self.resources.open(&archive_name)?;

        fs::create_dir_all(install_dir).map_err(|source| BundleError::InstallDirectory {
            path: install_dir.to_path_buf(),
            source,
        })?;
        self.check.invalidate(install_dir)?;

        info!(
            %descriptor,
            archive = %archive_name,
            install_dir = %install_dir.display(),
            "Extracting bundle"
        );
        let summary = self.extractor.extract(archive, install_dir)?;
        self.check.mark_installed(install_dir, &descriptor, &summary)?;

        Ok(InstallOutcome::Extracted {
            descriptor,
            summary,
        })
    }
}

impl fmt::Debug for BundleLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleLoader")
            .field("naming", &self.naming)
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}
