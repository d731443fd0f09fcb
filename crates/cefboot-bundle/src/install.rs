//! Installation presence checks.
//!
//! An extraction that was interrupted must never look complete, so
//! [`MarkerFile`] removes its marker before extracting and writes it again
//! (via a temporary file and a rename) only after every entry is on disk.

use crate::{BundleDescriptor, BundleResult, ExtractionSummary};
use cefboot_core::{InstallPolicy, PlatformId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the install marker inside the installation directory.
pub const MARKER_FILE: &str = ".cefboot-install.json";

/// Decides whether an installation directory already holds a bundle.
pub trait InstallCheck: Send + Sync {
    /// Check whether `root` holds a complete install of `descriptor`.
    fn is_installed(&self, root: &Path, descriptor: &BundleDescriptor) -> bool;

    /// Called before extraction starts.
    fn invalidate(&self, _root: &Path) -> BundleResult<()> {
        Ok(())
    }

    /// Called after extraction completed.
    fn mark_installed(
        &self,
        _root: &Path,
        _descriptor: &BundleDescriptor,
        _summary: &ExtractionSummary,
    ) -> BundleResult<()> {
        Ok(())
    }
}

/// Create the check for a configured policy.
pub fn for_policy(policy: InstallPolicy) -> Box<dyn InstallCheck> {
    match policy {
        InstallPolicy::AlwaysExtract => Box::new(AlwaysExtract),
        InstallPolicy::MarkerFile => Box::new(MarkerFile),
    }
}

/// Never reports an installation; every build extracts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysExtract;

impl InstallCheck for AlwaysExtract {
    fn is_installed(&self, _root: &Path, _descriptor: &BundleDescriptor) -> bool {
        false
    }
}

/// Contents of the install marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallMarker {
    pub platform: PlatformId,
    pub release_tag: String,
    pub archive_sha256: String,
    pub files: usize,
}

impl InstallMarker {
    /// Read the marker in `root`, if there is a readable one.
    pub fn read(root: &Path) -> Option<Self> {
        let bytes = fs::read(marker_path(root)).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(marker) => Some(marker),
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Ignoring unreadable install marker");
                None
            }
        }
    }

    fn matches(&self, descriptor: &BundleDescriptor) -> bool {
        self.platform == descriptor.platform && self.release_tag == descriptor.release_tag
    }
}

/// Trusts an installation whose marker names the same platform and release.
///
/// The release tag is the bundle identity. The recorded `archive_sha256` is
/// informational and is not compared, so checking an install never has to
/// read or hash the archive. Publish a replaced archive under a new tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerFile;

impl InstallCheck for MarkerFile {
    fn is_installed(&self, root: &Path, descriptor: &BundleDescriptor) -> bool {
        let installed = InstallMarker::read(root)
            .map(|marker| marker.matches(descriptor))
            .unwrap_or(false);
        debug!(root = %root.display(), %descriptor, installed, "Checked install marker");
        installed
    }

    fn invalidate(&self, root: &Path) -> BundleResult<()> {
        match fs::remove_file(marker_path(root)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn mark_installed(
        &self,
        root: &Path,
        descriptor: &BundleDescriptor,
        summary: &ExtractionSummary,
    ) -> BundleResult<()> {
        let marker = InstallMarker {
            platform: descriptor.platform,
            release_tag: descriptor.release_tag.clone(),
            archive_sha256: summary.archive_sha256.clone(),
            files: summary.files,
        };
        let json = serde_json::to_vec_pretty(&marker)?;

        let temp_path = root.join(format!("{MARKER_FILE}.tmp"));
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, marker_path(root))?;
        Ok(())
    }
}

fn marker_path(root: &Path) -> PathBuf {
    root.join(MARKER_FILE)
}
