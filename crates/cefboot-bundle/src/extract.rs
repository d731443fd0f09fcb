//! Streaming extraction of `.tar.gz` bundles.
//!
//! Entries are written in archive order. Directory creation and permission
//! failures are logged and skipped; stream and file write failures abort.

use crate::{BundleError, BundleResult};
use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use tracing::{debug, warn};

/// Size of the copy buffer used for file entries.
pub const BUFFER_SIZE: usize = 4096;

#[cfg(unix)]
const EXECUTE_BITS: u32 = 0o111;

/// What an extraction wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub directories: usize,
    pub files: usize,
    pub symlinks: usize,
    /// Entries of unsupported types, or links pointing outside the destination.
    pub skipped: usize,
    /// Bytes written across all file entries.
    pub bytes: u64,
    /// SHA-256 of the compressed archive as read, hex encoded.
    pub archive_sha256: String,
}

/// Extracts gzip-compressed tar archives into a directory.
///
/// # Example
///
/// ```no_run
/// use cefboot_bundle::ArchiveExtractor;
/// use std::fs::File;
/// use std::path::Path;
///
/// let archive = File::open("jcef-natives-linux-amd64-v1.tar.gz")?;
/// let summary = ArchiveExtractor::new().extract(archive, Path::new("jcef-bundle"))?;
/// println!("{} files, {} bytes", summary.files, summary.bytes);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveExtractor {
    buffer_size: usize,
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self {
            buffer_size: BUFFER_SIZE,
        }
    }
}

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different copy buffer size (minimum 1 byte).
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Extract the archive at `path` into `destination`.
    pub fn extract_path(&self, path: &Path, destination: &Path) -> BundleResult<ExtractionSummary> {
        let file = File::open(path)?;
        self.extract(io::BufReader::new(file), destination)
    }

    /// Extract a gzip-compressed tar stream into `destination`.
    ///
    /// Existing directories are reused and existing files are overwritten, so
    /// extracting the same archive twice succeeds.
    pub fn extract<R: Read>(
        &self,
        archive: R,
        destination: &Path,
    ) -> BundleResult<ExtractionSummary> {
        debug!(destination = %destination.display(), "Extracting archive");

        fs::create_dir_all(destination).map_err(BundleError::extraction)?;
        let root = fs::canonicalize(destination).map_err(BundleError::extraction)?;

        let mut archive = Archive::new(GzDecoder::new(HashingReader::new(archive)));
        let mut summary = ExtractionSummary::default();
        let mut buffer = vec![0u8; self.buffer_size];

        for entry in archive.entries().map_err(BundleError::extraction)? {
            let mut entry = entry.map_err(BundleError::extraction)?;
            let relative = entry.path().map_err(BundleError::extraction)?.into_owned();
            let target = safe_join(destination, &relative)?;
            let mode = entry.header().mode().unwrap_or(0);
            let entry_type = entry.header().entry_type();

            // Links extracted earlier may redirect a lexically safe path
            let anchor = if entry_type.is_dir() {
                target.as_path()
            } else {
                target
                    .parent()
                    .filter(|parent| parent.starts_with(destination))
                    .unwrap_or(destination)
            };
            if !resolves_inside(&root, anchor) {
                return Err(BundleError::UnsafeEntryPath(
                    relative.display().to_string(),
                ));
            }

            if entry_type.is_dir() {
                extract_directory(&target, mode);
                summary.directories += 1;
            } else if entry_type.is_file() {
                let written = extract_file(&mut entry, &target, mode, &mut buffer)?;
                summary.files += 1;
                summary.bytes += written;
            } else if entry_type.is_symlink() {
                let link = entry.link_name().map_err(BundleError::extraction)?;
                match link {
                    Some(link)
                        if link_stays_inside(&relative, &link)
                            && resolves_inside(&root, &anchor.join(&*link)) =>
                    {
                        if extract_symlink(&link, &target)? {
                            summary.symlinks += 1;
                        } else {
                            summary.skipped += 1;
                        }
                    }
                    _ => {
                        warn!(
                            path = %relative.display(),
                            "Skipping symlink pointing outside the bundle"
                        );
                        summary.skipped += 1;
                    }
                }
            } else {
                debug!(
                    path = %relative.display(),
                    ?entry_type,
                    "Skipping unsupported archive entry"
                );
                summary.skipped += 1;
            }
        }

        // Read the trailer too so the digest covers the whole input
        let mut hashing = archive.into_inner().into_inner();
        io::copy(&mut hashing, &mut io::sink()).map_err(BundleError::extraction)?;
        summary.archive_sha256 = hashing.finish();

        debug!(
            directories = summary.directories,
            files = summary.files,
            bytes = summary.bytes,
            "Extraction complete"
        );
        Ok(summary)
    }
}

fn safe_join(root: &Path, relative: &Path) -> BundleResult<PathBuf> {
    let mut target = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => target.push(part),
            Component::CurDir => {}
            _ => {
                return Err(BundleError::UnsafeEntryPath(
                    relative.display().to_string(),
                ));
            }
        }
    }
    Ok(target)
}

// Lexically resolve `link` from the entry's parent and require it to stay
// under the destination root.
fn link_stays_inside(entry: &Path, link: &Path) -> bool {
    let mut depth = entry
        .parent()
        .map(|p| {
            p.components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count()
        })
        .unwrap_or(0);

    for component in link.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

// Canonicalize the deepest existing ancestor of `path` and require it to stay
// under `root`, which must already be canonical.
fn resolves_inside(root: &Path, path: &Path) -> bool {
    let mut current = Some(path);
    while let Some(candidate) = current {
        if let Ok(real) = fs::canonicalize(candidate) {
            return real.starts_with(root);
        }
        current = candidate.parent();
    }
    false
}

fn extract_directory(target: &Path, mode: u32) {
    if let Err(e) = fs::create_dir_all(target) {
        warn!(
            path = %target.display(),
            error = %e,
            "Unable to create directory during extraction"
        );
        return;
    }
    propagate_executable(target, mode);
}

fn extract_file<R: Read>(
    entry: &mut R,
    target: &Path,
    mode: u32,
    buffer: &mut [u8],
) -> BundleResult<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(BundleError::extraction)?;
    }
    // A symlink left by an earlier extraction would redirect the write
    if is_symlink(target) {
        fs::remove_file(target).map_err(BundleError::extraction)?;
    }

    let file = File::create(target).map_err(BundleError::extraction)?;
    let mut out = BufWriter::with_capacity(buffer.len(), file);
    let mut written = 0u64;
    loop {
        let count = entry.read(buffer).map_err(BundleError::extraction)?;
        if count == 0 {
            break;
        }
        out.write_all(&buffer[..count])
            .map_err(BundleError::extraction)?;
        written += count as u64;
    }
    out.flush().map_err(BundleError::extraction)?;
    drop(out);

    propagate_executable(target, mode);
    Ok(written)
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

#[cfg(unix)]
fn extract_symlink(link: &Path, target: &Path) -> BundleResult<bool> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(BundleError::extraction)?;
    }
    match fs::symlink_metadata(target) {
        Ok(meta) if meta.is_dir() => {
            warn!(path = %target.display(), "Directory in the way of symlink, skipping");
            return Ok(false);
        }
        Ok(_) => fs::remove_file(target).map_err(BundleError::extraction)?,
        Err(_) => {}
    }
    std::os::unix::fs::symlink(link, target).map_err(BundleError::extraction)?;
    Ok(true)
}

#[cfg(not(unix))]
fn extract_symlink(_link: &Path, target: &Path) -> BundleResult<bool> {
    debug!(path = %target.display(), "Symlinks are not extracted on this platform");
    Ok(false)
}

#[cfg(unix)]
fn propagate_executable(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    if mode & EXECUTE_BITS == 0 {
        return;
    }
    let result = fs::metadata(path).and_then(|meta| {
        let mut perms = meta.permissions();
        perms.set_mode(perms.mode() | (mode & EXECUTE_BITS) | 0o100);
        fs::set_permissions(path, perms)
    });
    if let Err(e) = result {
        warn!(
            path = %path.display(),
            error = %e,
            "Unable to mark entry executable during extraction"
        );
    }
}

#[cfg(not(unix))]
fn propagate_executable(_path: &Path, _mode: u32) {}

/// Reader that hashes everything passing through it.
struct HashingReader<R> {
    inner: R,
    hasher: Sha256,
}

impl<R> HashingReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = self.inner.read(buf)?;
        self.hasher.update(&buf[..count]);
        Ok(count)
    }
}

#[cfg(test)]
#[path = "extract/extract_tests.rs"]
mod extract_tests;
