//! Bootstrap configuration types

use crate::{BootstrapError, BootstrapResult, PlatformId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Install directory used when none is configured
pub const DEFAULT_INSTALL_DIR: &str = "jcef-bundle";

/// How the coordinator decides whether a bundle is already installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallPolicy {
    /// Never trust an existing layout; extract on every build
    AlwaysExtract,
    /// Trust the layout when its install marker matches the bundle
    #[default]
    MarkerFile,
}

/// Configuration for bootstrapping the native runtime
///
/// Built by the caller, then handed to a coordinator which takes ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Directory the bundle is extracted into
    #[serde(default = "default_install_dir")]
    pub install_dir: PathBuf,

    /// Extra startup arguments, passed to the runtime in order
    #[serde(default)]
    pub args: Vec<String>,

    /// Settings handed to the runtime initializer
    #[serde(default)]
    pub settings: RuntimeSettings,

    /// Force a platform instead of detecting the host
    #[serde(default)]
    pub platform: Option<PlatformId>,

    /// Installation presence check
    #[serde(default)]
    pub install_policy: InstallPolicy,

    /// Prefix of the per-platform archive resources
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,

    /// Name of the resource holding the release tag
    #[serde(default = "default_release_tag_resource")]
    pub release_tag_resource: String,

    /// How long a caller waits for another thread's build (None = forever)
    #[serde(default)]
    pub build_timeout_ms: Option<u64>,
}

fn default_install_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INSTALL_DIR)
}

fn default_archive_prefix() -> String {
    "jcef-natives".to_string()
}

fn default_release_tag_resource() -> String {
    "jcef-release-tag".to_string()
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(),
            args: Vec::new(),
            settings: RuntimeSettings::default(),
            platform: None,
            install_policy: InstallPolicy::default(),
            archive_prefix: default_archive_prefix(),
            release_tag_resource: default_release_tag_resource(),
            build_timeout_ms: None,
        }
    }
}

impl BootstrapConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> BootstrapResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the installation directory
    pub fn with_install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_dir = dir.into();
        self
    }

    /// Append one startup argument
    pub fn add_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several startup arguments, keeping their order
    pub fn add_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Force the bundle platform
    pub fn with_platform(mut self, platform: PlatformId) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set the installation presence check
    pub fn with_install_policy(mut self, policy: InstallPolicy) -> Self {
        self.install_policy = policy;
        self
    }

    /// Bound how long concurrent callers wait for a build in progress
    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.build_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Mutable access to the startup arguments
    pub fn args_mut(&mut self) -> &mut Vec<String> {
        &mut self.args
    }

    /// Mutable access to the runtime settings
    pub fn settings_mut(&mut self) -> &mut RuntimeSettings {
        &mut self.settings
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn build_timeout(&self) -> Option<Duration> {
        self.build_timeout_ms.map(Duration::from_millis)
    }

    /// Resolve the configured platform, falling back to the host
    pub fn resolve_platform(&self) -> BootstrapResult<PlatformId> {
        match self.platform {
            Some(platform) => Ok(platform),
            None => PlatformId::current(),
        }
    }

    /// Check the configuration for values that cannot work
    pub fn validate(&self) -> BootstrapResult<()> {
        if self.install_dir.as_os_str().is_empty() {
            return Err(BootstrapError::ConfigError(
                "install_dir cannot be empty".to_string(),
            ));
        }
        if self.archive_prefix.trim().is_empty() {
            return Err(BootstrapError::ConfigError(
                "archive_prefix cannot be empty".to_string(),
            ));
        }
        if self.release_tag_resource.trim().is_empty() {
            return Err(BootstrapError::ConfigError(
                "release_tag_resource cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings passed through to the native runtime
///
/// The well-known fields mirror the runtime's most common options. Anything
/// else goes in `extra` and is forwarded untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Render off-screen instead of into a native window
    #[serde(default = "default_windowless")]
    pub windowless_rendering_enabled: bool,

    /// Runtime log severity (e.g. "info", "warning", "disable")
    #[serde(default)]
    pub log_severity: Option<String>,

    /// Locale used for resources
    #[serde(default)]
    pub locale: Option<String>,

    /// Directory for cache data (None = in-memory)
    #[serde(default)]
    pub cache_path: Option<PathBuf>,

    /// Port for remote debugging (None = disabled)
    #[serde(default)]
    pub remote_debugging_port: Option<u16>,

    /// Override for the user agent string
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Persist session cookies to `cache_path`
    #[serde(default)]
    pub persist_session_cookies: bool,

    /// Additional runtime-specific settings
    #[serde(default)]
    pub extra: serde_json::Value,
}

fn default_windowless() -> bool {
    true
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            windowless_rendering_enabled: default_windowless(),
            log_severity: None,
            locale: None,
            cache_path: None,
            remote_debugging_port: None,
            user_agent: None,
            persist_session_cookies: false,
            extra: serde_json::Value::Null,
        }
    }
}

impl RuntimeSettings {
    /// Get a typed value from the extra settings
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.extra
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a value in the extra settings
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> BootstrapResult<()> {
        let value = serde_json::to_value(value)?;
        if let Some(obj) = self.extra.as_object_mut() {
            obj.insert(key.to_string(), value);
        } else {
            let mut obj = serde_json::Map::new();
            obj.insert(key.to_string(), value);
            self.extra = serde_json::Value::Object(obj);
        }
        Ok(())
    }

    /// Serialize the settings for handing across an FFI boundary
    pub fn to_json(&self) -> BootstrapResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
