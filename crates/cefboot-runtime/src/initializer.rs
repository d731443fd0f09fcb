//! The seam between the bootstrap and the native runtime.

use cefboot_core::{BootstrapResult, RuntimeSettings};
use std::path::Path;

/// The single object produced by a successful initialization.
pub trait RuntimeHandle: Send + Sync + 'static {
    /// Release the native runtime.
    ///
    /// Called at most once, through the [`Disposer`](crate::Disposer).
    fn dispose(&self);
}

/// Starts the native runtime from an installed bundle.
pub trait Initializer: Send + Sync {
    type Handle: RuntimeHandle;

    /// Initialize the runtime found in `install_dir`.
    ///
    /// `args` are passed in order; `settings` are passed through untouched.
    fn initialize(
        &self,
        install_dir: &Path,
        args: &[String],
        settings: &RuntimeSettings,
    ) -> BootstrapResult<Self::Handle>;
}

/// Adapts a closure into an [`Initializer`].
///
/// # Example
///
/// ```
/// use cefboot_runtime::{FnInitializer, RuntimeHandle};
///
/// struct Noop;
///
/// impl RuntimeHandle for Noop {
///     fn dispose(&self) {}
/// }
///
/// let initializer = FnInitializer::new(|_dir, _args, _settings| Ok(Noop));
/// # let _ = initializer;
/// ```
pub struct FnInitializer<F> {
    init: F,
}

impl<F> FnInitializer<F> {
    pub fn new<H>(init: F) -> Self
    where
        F: Fn(&Path, &[String], &RuntimeSettings) -> BootstrapResult<H> + Send + Sync,
        H: RuntimeHandle,
    {
        Self { init }
    }
}

impl<F, H> Initializer for FnInitializer<F>
where
    F: Fn(&Path, &[String], &RuntimeSettings) -> BootstrapResult<H> + Send + Sync,
    H: RuntimeHandle,
{
    type Handle = H;

    fn initialize(
        &self,
        install_dir: &Path,
        args: &[String],
        settings: &RuntimeSettings,
    ) -> BootstrapResult<H> {
        (self.init)(install_dir, args, settings)
    }
}
