//! cefboot-runtime - Bootstrap coordination for the native runtime
//!
//! This crate provides:
//! - [`BootstrapCoordinator`] running the bootstrap once and memoizing the handle
//! - [`Initializer`] and [`RuntimeHandle`], the seam to the native runtime
//! - [`NativeLibraryInitializer`] calling C entry points of a shared library
//! - [`Disposer`] for releasing the runtime exactly once

mod coordinator;
mod disposer;
mod initializer;
mod native;

pub use coordinator::{BootstrapCoordinator, Bootstrapped};
pub use disposer::{DisposeGuard, Disposer};
pub use initializer::{FnInitializer, Initializer, RuntimeHandle};
pub use native::{DISPOSE_SYMBOL, INITIALIZE_SYMBOL, NativeLibraryInitializer, NativeRuntime};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BootstrapCoordinator, Bootstrapped, DisposeGuard, Disposer, Initializer,
        NativeLibraryInitializer, RuntimeHandle,
    };
}
