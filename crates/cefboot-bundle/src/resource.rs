//! Read-only resources shipped alongside the program.
//!
//! A resource source holds the release-tag resource and one `.tar.gz`
//! archive per platform. [`DirectoryResources`] reads them from disk,
//! [`EmbeddedResources`] serves bytes compiled into the binary.

use crate::{BundleError, BundleResult};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// A named collection of read-only resources.
pub trait ResourceSource: Send + Sync {
    /// Open a resource for streaming.
    ///
    /// Returns [`BundleError::MissingResource`] when `name` does not exist.
    fn open(&self, name: &str) -> BundleResult<Box<dyn Read + Send + '_>>;

    /// Check whether a resource exists.
    fn contains(&self, name: &str) -> bool;

    /// Read a whole resource as UTF-8 text.
    fn read_string(&self, name: &str) -> BundleResult<String> {
        let mut reader = self.open(name)?;
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        Ok(contents)
    }
}

/// Resources stored as files in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> BundleResult<PathBuf> {
        let relative = Path::new(name);
        if name.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(BundleError::MissingResource(name.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ResourceSource for DirectoryResources {
    fn open(&self, name: &str) -> BundleResult<Box<dyn Read + Send + '_>> {
        let path = self.path_for(name)?;
        match File::open(&path) {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BundleError::MissingResource(name.to_string()))
            }
            Err(e) => Err(BundleError::Io(e)),
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }
}

/// Resources held in memory, typically from `include_bytes!`.
///
/// # Example
///
/// ```
/// use cefboot_bundle::{EmbeddedResources, ResourceSource};
///
/// let resources = EmbeddedResources::new()
///     .with("jcef-release-tag", b"jcef-1770317+cef-118.7.1".as_slice());
///
/// assert!(resources.contains("jcef-release-tag"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: HashMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing any previous one with the same name.
    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) {
        self.entries.insert(name.into(), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceSource for EmbeddedResources {
    fn open(&self, name: &str) -> BundleResult<Box<dyn Read + Send + '_>> {
        self.entries
            .get(name)
            .map(|bytes| Box::new(Cursor::new(bytes.as_ref())) as Box<dyn Read + Send + '_>)
            .ok_or_else(|| BundleError::MissingResource(name.to_string()))
    }

    fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}
