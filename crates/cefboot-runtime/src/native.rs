//! Native runtime initialization through a shared library.
//!
//! The bundle ships a library exporting two C entry points:
//!
//! ```c
//! void *cefboot_initialize(const uint8_t *install_dir, size_t install_dir_len,
//!                          const char *const *args, size_t args_len,
//!                          const uint8_t *settings_json, size_t settings_len);
//! void cefboot_dispose(void *handle);
//! ```
//!
//! `cefboot_initialize` returns null on failure.

use crate::{Initializer, RuntimeHandle};
use cefboot_core::{BootstrapError, BootstrapResult, RuntimeSettings};
use libloading::{Library, Symbol};
use std::ffi::{CString, c_char, c_void};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Default initialization entry point.
pub const INITIALIZE_SYMBOL: &str = "cefboot_initialize";

/// Default disposal entry point.
pub const DISPOSE_SYMBOL: &str = "cefboot_dispose";

type InitializeFn = unsafe extern "C" fn(
    install_dir: *const u8,
    install_dir_len: usize,
    args: *const *const c_char,
    args_len: usize,
    settings_json: *const u8,
    settings_len: usize,
) -> *mut c_void;
type DisposeFn = unsafe extern "C" fn(handle: *mut c_void);

/// Loads the runtime library from the install directory and calls its
/// initialization entry point.
#[derive(Debug, Clone)]
pub struct NativeLibraryInitializer {
    library_name: String,
    initialize_symbol: String,
    dispose_symbol: String,
}

impl NativeLibraryInitializer {
    /// `library_name` is the bare name; the platform prefix and suffix are
    /// added (`cefboot_native` becomes `libcefboot_native.so` on Linux).
    pub fn new(library_name: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
            initialize_symbol: INITIALIZE_SYMBOL.to_string(),
            dispose_symbol: DISPOSE_SYMBOL.to_string(),
        }
    }

    pub fn with_symbols(
        mut self,
        initialize: impl Into<String>,
        dispose: impl Into<String>,
    ) -> Self {
        self.initialize_symbol = initialize.into();
        self.dispose_symbol = dispose.into();
        self
    }

    /// Full path of the library inside `install_dir`.
    pub fn library_path(&self, install_dir: &Path) -> PathBuf {
        install_dir.join(libloading::library_filename(&self.library_name))
    }
}

impl Initializer for NativeLibraryInitializer {
    type Handle = NativeRuntime;

    fn initialize(
        &self,
        install_dir: &Path,
        args: &[String],
        settings: &RuntimeSettings,
    ) -> BootstrapResult<NativeRuntime> {
        let install_dir_str = install_dir.to_str().ok_or_else(|| {
            BootstrapError::ConfigError(format!(
                "install directory is not valid UTF-8: {}",
                install_dir.display()
            ))
        })?;
        let c_args = args
            .iter()
            .map(|arg| {
                CString::new(arg.as_str()).map_err(|_| {
                    BootstrapError::ConfigError(format!("argument contains a NUL byte: {arg:?}"))
                })
            })
            .collect::<BootstrapResult<Vec<_>>>()?;
        let arg_ptrs: Vec<*const c_char> = c_args.iter().map(|arg| arg.as_ptr()).collect();
        let settings_json = settings.to_json()?;
        let initialize_name = symbol_name(&self.initialize_symbol)?;
        let dispose_name = symbol_name(&self.dispose_symbol)?;

        let library_path = self.library_path(install_dir);
        info!(library = %library_path.display(), "Loading native runtime");

        // SAFETY: The library comes from the installed bundle, which the
        // caller trusts to export the documented entry points.
        let library = unsafe { Library::new(&library_path) }.map_err(|e| {
            BootstrapError::InitializationFailed(format!("{}: {e}", library_path.display()))
        })?;

        // SAFETY: Symbol types match the documented C signatures.
        let (initialize_fn, dispose_fn) = unsafe {
            let initialize: Symbol<InitializeFn> = library
                .get(initialize_name.as_bytes_with_nul())
                .map_err(|e| missing_symbol(&self.initialize_symbol, e))?;
            let dispose: Symbol<DisposeFn> = library
                .get(dispose_name.as_bytes_with_nul())
                .map_err(|e| missing_symbol(&self.dispose_symbol, e))?;
            (*initialize, *dispose)
        };

        debug!(
            args = args.len(),
            settings_len = settings_json.len(),
            "Calling {}",
            self.initialize_symbol
        );
        // SAFETY: Every pointer is valid for its length for the duration of the call.
        let handle = unsafe {
            initialize_fn(
                install_dir_str.as_ptr(),
                install_dir_str.len(),
                arg_ptrs.as_ptr(),
                arg_ptrs.len(),
                settings_json.as_ptr(),
                settings_json.len(),
            )
        };
        if handle.is_null() {
            return Err(BootstrapError::InitializationFailed(format!(
                "{} returned null",
                self.initialize_symbol
            )));
        }

        Ok(NativeRuntime {
            handle: handle as usize,
            dispose_fn,
            disposed: AtomicBool::new(false),
            _library: library,
        })
    }
}

fn missing_symbol(symbol: &str, err: libloading::Error) -> BootstrapError {
    BootstrapError::InitializationFailed(format!("{symbol}: {err}"))
}

fn symbol_name(symbol: &str) -> BootstrapResult<CString> {
    CString::new(symbol)
        .map_err(|_| BootstrapError::ConfigError(format!("invalid symbol name: {symbol:?}")))
}

/// A runtime started by [`NativeLibraryInitializer`].
///
/// Keeps the library loaded for as long as the handle lives.
pub struct NativeRuntime {
    handle: usize,
    dispose_fn: DisposeFn,
    disposed: AtomicBool,
    _library: Library,
}

impl NativeRuntime {
    /// The opaque pointer returned by the initialization entry point.
    pub fn raw_handle(&self) -> usize {
        self.handle
    }
}

impl RuntimeHandle for NativeRuntime {
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        // SAFETY: handle came from the initialization entry point of the
        // same library and is disposed only once.
        unsafe { (self.dispose_fn)(self.handle as *mut c_void) }
    }
}

impl std::fmt::Debug for NativeRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeRuntime")
            .field("handle", &format_args!("{:#x}", self.handle))
            .field("disposed", &self.disposed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
