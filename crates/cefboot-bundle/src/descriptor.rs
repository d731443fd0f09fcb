//! Bundle naming and identification.

use crate::{ARCHIVE_EXTENSION, BundleError, BundleResult, ResourceSource};
use cefboot_core::{BootstrapConfig, PlatformId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, BufReader};

/// Names of the resources that make up a bundle set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleNaming {
    /// Prefix of each archive resource (e.g., "jcef-natives").
    pub archive_prefix: String,
    /// Resource holding the release tag.
    pub release_tag_resource: String,
}

impl Default for BundleNaming {
    fn default() -> Self {
        Self {
            archive_prefix: "jcef-natives".to_string(),
            release_tag_resource: "jcef-release-tag".to_string(),
        }
    }
}

impl BundleNaming {
    #[must_use]
    pub fn from_config(config: &BootstrapConfig) -> Self {
        Self {
            archive_prefix: config.archive_prefix.clone(),
            release_tag_resource: config.release_tag_resource.clone(),
        }
    }

    /// Format the archive resource name for a platform and tag.
    ///
    /// # Example
    ///
    /// ```
    /// use cefboot_bundle::BundleNaming;
    /// use cefboot_core::PlatformId;
    ///
    /// let naming = BundleNaming::default();
    /// assert_eq!(
    ///     naming.archive_name(PlatformId::LINUX_AMD64, "v1"),
    ///     "jcef-natives-linux-amd64-v1.tar.gz"
    /// );
    /// ```
    #[must_use]
    pub fn archive_name(&self, platform: PlatformId, release_tag: &str) -> String {
        format!(
            "{}-{}-{}.{ARCHIVE_EXTENSION}",
            self.archive_prefix,
            platform.identifier(),
            release_tag
        )
    }

    /// Read the release tag from its companion resource.
    ///
    /// Lines are concatenated and surrounding whitespace is trimmed.
    pub fn read_release_tag(&self, resources: &dyn ResourceSource) -> BundleResult<String> {
        let reader = BufReader::new(resources.open(&self.release_tag_resource)?);
        let mut tag = String::new();
        for line in reader.lines() {
            tag.push_str(&line?);
        }
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(BundleError::InvalidReleaseTag(format!(
                "{} is empty",
                self.release_tag_resource
            )));
        }
        Ok(tag.to_string())
    }
}

/// Identifies the archive to extract for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDescriptor {
    pub platform: PlatformId,
    pub release_tag: String,
}

impl BundleDescriptor {
    pub fn new(platform: PlatformId, release_tag: impl Into<String>) -> Self {
        Self {
            platform,
            release_tag: release_tag.into(),
        }
    }

    /// Build the descriptor for `platform` by reading the release tag.
    pub fn locate(
        platform: PlatformId,
        resources: &dyn ResourceSource,
        naming: &BundleNaming,
    ) -> BundleResult<Self> {
        let release_tag = naming.read_release_tag(resources)?;
        Ok(Self::new(platform, release_tag))
    }

    #[must_use]
    pub fn archive_name(&self, naming: &BundleNaming) -> String {
        naming.archive_name(self.platform, &self.release_tag)
    }
}

impl fmt::Display for BundleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.platform, self.release_tag)
    }
}
