//! Scoped release of the runtime handle

use crate::RuntimeHandle;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Handle for releasing the native runtime
///
/// Clones share the same disposed flag, so the runtime is disposed exactly
/// once no matter how many clones call [`Disposer::dispose`].
#[derive(Clone)]
pub struct Disposer {
    disposed: Arc<AtomicBool>,
    handle: Arc<dyn RuntimeHandle>,
}

impl Disposer {
    /// Create a disposer for `handle`
    pub fn new(handle: Arc<dyn RuntimeHandle>) -> Self {
        Self {
            disposed: Arc::new(AtomicBool::new(false)),
            handle,
        }
    }

    /// Dispose the runtime
    ///
    /// Returns `true` if this call performed the disposal.
    pub fn dispose(&self) -> bool {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return false;
        }
        info!("Disposing native runtime");
        self.handle.dispose();
        true
    }

    /// Check if the runtime has been disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Get a guard that disposes the runtime when dropped
    pub fn guard(&self) -> DisposeGuard {
        DisposeGuard {
            disposer: Some(self.clone()),
        }
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

/// Disposes the runtime on drop unless defused
#[must_use = "the runtime is disposed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct DisposeGuard {
    disposer: Option<Disposer>,
}

impl DisposeGuard {
    /// Drop the guard without disposing
    pub fn defuse(mut self) {
        self.disposer = None;
    }
}

impl Drop for DisposeGuard {
    fn drop(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer.dispose();
        }
    }
}
