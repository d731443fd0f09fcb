//! Platform detection and identification.

use crate::{BootstrapError, BootstrapResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// Pattern lists are checked in declaration order. "darwin" contains "win",
// "x86_64" contains "x86" and "arm64" contains "arm", so the more specific
// entries must come first.
const OS_PATTERNS: &[(OperatingSystem, &[&str])] = &[
    (OperatingSystem::MacOsx, &["mac", "darwin"]),
    (OperatingSystem::Linux, &["nux"]),
    (OperatingSystem::Windows, &["win"]),
];

const ARCH_PATTERNS: &[(Architecture, &[&str])] = &[
    (Architecture::Amd64, &["amd64", "x86_64"]),
    (Architecture::Arm64, &["arm64", "aarch64"]),
    (
        Architecture::I386,
        &["x86", "i386", "i486", "i586", "i686", "i786"],
    ),
    (Architecture::Arm, &["arm"]),
];

/// Operating systems a bundle can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingSystem {
    /// macOS.
    MacOsx,
    /// Linux.
    Linux,
    /// Windows.
    Windows,
}

impl OperatingSystem {
    /// Match a raw OS name such as `"Mac OS X"` or `"Windows 10"`.
    #[must_use]
    pub fn detect(raw: &str) -> Option<Self> {
        let raw = raw.to_ascii_lowercase();
        OS_PATTERNS
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| raw.contains(p)))
            .map(|(os, _)| *os)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MacOsx => "macosx",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }

    pub fn is_macosx(&self) -> bool {
        matches!(self, Self::MacOsx)
    }

    pub fn is_linux(&self) -> bool {
        matches!(self, Self::Linux)
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }
}

/// CPU architectures a bundle can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// x86_64 / AMD64.
    Amd64,
    /// 32-bit x86.
    I386,
    /// AArch64 / ARM64.
    Arm64,
    /// 32-bit ARM.
    Arm,
}

impl Architecture {
    /// Match a raw architecture string such as `"x86_64"` or `"aarch64"`.
    #[must_use]
    pub fn detect(raw: &str) -> Option<Self> {
        let raw = raw.to_ascii_lowercase();
        ARCH_PATTERNS
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| raw.contains(p)))
            .map(|(arch, _)| *arch)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::I386 => "i386",
            Self::Arm64 => "arm64",
            Self::Arm => "arm",
        }
    }
}

/// An (operating system, architecture) pair that has a native bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlatformId {
    os: OperatingSystem,
    arch: Architecture,
}

impl PlatformId {
    pub const LINUX_AMD64: Self = Self::of(OperatingSystem::Linux, Architecture::Amd64);
    pub const LINUX_I386: Self = Self::of(OperatingSystem::Linux, Architecture::I386);
    pub const LINUX_ARM64: Self = Self::of(OperatingSystem::Linux, Architecture::Arm64);
    pub const LINUX_ARM: Self = Self::of(OperatingSystem::Linux, Architecture::Arm);
    pub const MACOSX_AMD64: Self = Self::of(OperatingSystem::MacOsx, Architecture::Amd64);
    pub const MACOSX_ARM64: Self = Self::of(OperatingSystem::MacOsx, Architecture::Arm64);
    pub const WINDOWS_AMD64: Self = Self::of(OperatingSystem::Windows, Architecture::Amd64);
    pub const WINDOWS_I386: Self = Self::of(OperatingSystem::Windows, Architecture::I386);
    pub const WINDOWS_ARM64: Self = Self::of(OperatingSystem::Windows, Architecture::Arm64);

    const fn of(os: OperatingSystem, arch: Architecture) -> Self {
        Self { os, arch }
    }

    /// Resolve raw OS-name and architecture strings to a platform.
    ///
    /// Matching is a case-insensitive substring search, so `"Mac OS X"` and
    /// `"darwin"` both resolve to macOS and `"arm64-special"` resolves to
    /// arm64 rather than arm.
    ///
    /// # Example
    ///
    /// ```
    /// use cefboot_core::PlatformId;
    ///
    /// let platform = PlatformId::resolve("Linux", "aarch64")?;
    /// assert_eq!(platform, PlatformId::LINUX_ARM64);
    /// assert_eq!(platform.identifier(), "linux-arm64");
    /// # Ok::<(), cefboot_core::BootstrapError>(())
    /// ```
    pub fn resolve(os_name: &str, os_arch: &str) -> BootstrapResult<Self> {
        let unsupported = || BootstrapError::UnsupportedPlatform {
            os_name: os_name.to_string(),
            os_arch: os_arch.to_string(),
        };

        let os = OperatingSystem::detect(os_name).ok_or_else(unsupported)?;
        let arch = Architecture::detect(os_arch).ok_or_else(unsupported)?;
        let platform = Self::of(os, arch);

        if Self::all().contains(&platform) {
            Ok(platform)
        } else {
            Err(unsupported())
        }
    }

    /// Detect the platform this process is running on.
    pub fn current() -> BootstrapResult<Self> {
        Self::resolve(std::env::consts::OS, std::env::consts::ARCH)
    }

    #[must_use]
    pub fn os(&self) -> OperatingSystem {
        self.os
    }

    #[must_use]
    pub fn arch(&self) -> Architecture {
        self.arch
    }

    /// Get the identifier used in bundle names (e.g., "linux-amd64").
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("{}-{}", self.os.as_str(), self.arch.as_str())
    }

    /// Parse a platform from its identifier.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.identifier() == s)
    }

    /// Get all platforms that have a native bundle.
    #[must_use]
    pub fn all() -> &'static [PlatformId] {
        &[
            Self::LINUX_AMD64,
            Self::LINUX_I386,
            Self::LINUX_ARM64,
            Self::LINUX_ARM,
            Self::MACOSX_AMD64,
            Self::MACOSX_ARM64,
            Self::WINDOWS_AMD64,
            Self::WINDOWS_I386,
            Self::WINDOWS_ARM64,
        ]
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

impl TryFrom<String> for PlatformId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown platform identifier: {value}"))
    }
}

impl From<PlatformId> for String {
    fn from(platform: PlatformId) -> Self {
        platform.identifier()
    }
}

#[cfg(test)]
#[path = "platform/platform_tests.rs"]
mod platform_tests;
