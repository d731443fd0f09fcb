//! Build-once bootstrap coordination
//!
//! A [`BootstrapCoordinator`] runs the whole bootstrap (platform resolution,
//! bundle installation and native initialization) at most once successfully.
//! Callers that arrive while a build is running block on that build's
//! completion cell and receive its outcome. A failed build is not memoized;
//! the coordinator returns to [`BuildState::Unbuilt`] so a later call retries.

use crate::{Disposer, Initializer};
use cefboot_bundle::{BundleLoader, InstallOutcome, ResourceSource};
use cefboot_core::{BootstrapConfig, BootstrapError, BootstrapResult, BuildState, PlatformId};
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// A built runtime together with the means to release it
pub struct Bootstrapped<H> {
    pub handle: Arc<H>,
    pub disposer: Disposer,
}

impl<H> Clone for Bootstrapped<H> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            disposer: self.disposer.clone(),
        }
    }
}

impl<H> fmt::Debug for Bootstrapped<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrapped")
            .field("disposer", &self.disposer)
            .finish_non_exhaustive()
    }
}

type AttemptResult<H> = Result<Bootstrapped<H>, Arc<BootstrapError>>;

/// One-shot completion cell shared by everyone taking part in one build attempt
struct Attempt<H> {
    result: Mutex<Option<AttemptResult<H>>>,
    done: Condvar,
}

impl<H> Attempt<H> {
    fn new() -> Self {
        Self {
            result: Mutex::new(None),
            done: Condvar::new(),
        }
    }

    fn complete(&self, result: AttemptResult<H>) {
        let mut slot = self.result.lock();
        *slot = Some(result);
        self.done.notify_all();
    }

    fn wait(&self, timeout: Option<Duration>) -> BootstrapResult<Bootstrapped<H>> {
        let deadline = timeout.map(|t| (Instant::now() + t, t));
        let mut slot = self.result.lock();
        loop {
            match slot.as_ref() {
                Some(Ok(built)) => return Ok(built.clone()),
                Some(Err(cause)) => return Err(BootstrapError::BuildFailed(cause.clone())),
                None => {}
            }
            match deadline {
                Some((deadline, timeout)) => {
                    if self.done.wait_until(&mut slot, deadline).timed_out() && slot.is_none() {
                        return Err(BootstrapError::WaitTimeout(timeout));
                    }
                }
                None => self.done.wait(&mut slot),
            }
        }
    }
}

enum Slot<H> {
    Unbuilt,
    Building(Arc<Attempt<H>>),
    Built(Bootstrapped<H>),
}

impl<H> Slot<H> {
    fn state(&self) -> BuildState {
        match self {
            Slot::Unbuilt => BuildState::Unbuilt,
            Slot::Building(_) => BuildState::Building,
            Slot::Built(_) => BuildState::Built,
        }
    }
}

enum Role<H> {
    Leader(Arc<Attempt<H>>),
    Waiter(Arc<Attempt<H>>),
}

/// Coordinates the one-time bootstrap of the native runtime.
///
/// The configuration is owned by the coordinator and cannot change after
/// construction.
///
/// # Example
///
/// ```no_run
/// use cefboot_bundle::DirectoryResources;
/// use cefboot_core::BootstrapConfig;
/// use cefboot_runtime::{BootstrapCoordinator, NativeLibraryInitializer};
/// use std::sync::Arc;
///
/// let config = BootstrapConfig::new()
///     .with_install_dir("jcef-bundle")
///     .add_arg("--disable-gpu");
/// let coordinator = BootstrapCoordinator::new(
///     config,
///     Arc::new(DirectoryResources::new("resources")),
///     NativeLibraryInitializer::new("cefboot_native"),
/// );
///
/// let runtime = coordinator.build()?;
/// let _guard = runtime.disposer.guard();
/// # Ok::<(), cefboot_core::BootstrapError>(())
/// ```
pub struct BootstrapCoordinator<I: Initializer> {
    config: BootstrapConfig,
    loader: BundleLoader,
    initializer: I,
    slot: Mutex<Slot<I::Handle>>,
}

impl<I: Initializer> BootstrapCoordinator<I> {
    /// Create a coordinator; nothing runs until [`build`](Self::build).
    pub fn new(
        config: BootstrapConfig,
        resources: Arc<dyn ResourceSource>,
        initializer: I,
    ) -> Self {
        let loader = BundleLoader::from_config(resources, &config);
        Self::with_loader(config, loader, initializer)
    }

    /// Create a coordinator with a preconfigured loader.
    pub fn with_loader(config: BootstrapConfig, loader: BundleLoader, initializer: I) -> Self {
        Self {
            config,
            loader,
            initializer,
            slot: Mutex::new(Slot::Unbuilt),
        }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    pub fn initializer(&self) -> &I {
        &self.initializer
    }

    pub fn state(&self) -> BuildState {
        self.slot.lock().state()
    }

    /// The memoized handle, if a build has succeeded.
    pub fn handle(&self) -> Option<Arc<I::Handle>> {
        match &*self.slot.lock() {
            Slot::Built(built) => Some(built.handle.clone()),
            _ => None,
        }
    }

    /// The disposer of the memoized handle, if a build has succeeded.
    pub fn disposer(&self) -> Option<Disposer> {
        match &*self.slot.lock() {
            Slot::Built(built) => Some(built.disposer.clone()),
            _ => None,
        }
    }

    /// Build the runtime, or return the one already built.
    ///
    /// Exactly one caller runs the build; concurrent callers wait for it and
    /// receive the same handle. When the build fails every caller of that
    /// attempt receives [`BootstrapError::BuildFailed`] with the shared cause
    /// and the coordinator returns to [`BuildState::Unbuilt`].
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::BuildFailed`] when the attempt failed and
    /// [`BootstrapError::WaitTimeout`] when a configured build timeout
    /// expired while waiting on another caller.
    pub fn build(&self) -> BootstrapResult<Bootstrapped<I::Handle>> {
        let role = {
            let mut slot = self.slot.lock();
            match &*slot {
                Slot::Built(built) => return Ok(built.clone()),
                Slot::Building(attempt) => Role::Waiter(attempt.clone()),
                Slot::Unbuilt => {
                    let attempt = Arc::new(Attempt::new());
                    *slot = Slot::Building(attempt.clone());
                    Role::Leader(attempt)
                }
            }
        };

        match role {
            Role::Waiter(attempt) => {
                debug!("Waiting for bootstrap in progress");
                attempt.wait(self.config.build_timeout())
            }
            Role::Leader(attempt) => self.lead(&attempt),
        }
    }

    fn lead(&self, attempt: &Attempt<I::Handle>) -> BootstrapResult<Bootstrapped<I::Handle>> {
        let mut abandon = AbandonGuard {
            coordinator: self,
            attempt,
            armed: true,
        };
        let outcome = self.run_build().map_err(Arc::new);
        abandon.armed = false;

        let mut slot = self.slot.lock();
        let next = match &outcome {
            Ok(_) => BuildState::Built,
            Err(_) => BuildState::Unbuilt,
        };
        debug_assert!(slot.state().can_transition_to(next));
        match &outcome {
            Ok(built) => {
                *slot = Slot::Built(built.clone());
                info!("Bootstrap complete");
            }
            Err(cause) => {
                *slot = Slot::Unbuilt;
                error!(error = %cause, "Bootstrap failed");
            }
        }
        attempt.complete(outcome.clone());
        drop(slot);

        outcome.map_err(BootstrapError::BuildFailed)
    }

    fn run_build(&self) -> BootstrapResult<Bootstrapped<I::Handle>> {
        self.config.validate()?;
        let platform = self.resolve_platform()?;
        let install_dir = self.config.install_dir();

        match self.loader.install(platform, install_dir)? {
            InstallOutcome::AlreadyInstalled(descriptor) => {
                info!(%descriptor, "Using installed bundle");
            }
            InstallOutcome::Extracted { descriptor, summary } => {
                info!(
                    %descriptor,
                    files = summary.files,
                    bytes = summary.bytes,
                    "Installed bundle"
                );
            }
        }

        info!(
            install_dir = %install_dir.display(),
            args = self.config.args.len(),
            "Initializing native runtime"
        );
        let handle = Arc::new(self.initializer.initialize(
            install_dir,
            &self.config.args,
            &self.config.settings,
        )?);
        let disposer = Disposer::new(handle.clone());

        Ok(Bootstrapped { handle, disposer })
    }

    fn resolve_platform(&self) -> BootstrapResult<PlatformId> {
        let platform = self.config.resolve_platform()?;
        info!(%platform, "Resolved platform");
        Ok(platform)
    }
}

/// Releases waiters if the leading caller unwinds mid-build
struct AbandonGuard<'a, I: Initializer> {
    coordinator: &'a BootstrapCoordinator<I>,
    attempt: &'a Attempt<I::Handle>,
    armed: bool,
}

impl<I: Initializer> Drop for AbandonGuard<'_, I> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slot = self.coordinator.slot.lock();
        *slot = Slot::Unbuilt;
        self.attempt.complete(Err(Arc::new(BootstrapError::InitializationFailed(
            "bootstrap panicked".to_string(),
        ))));
    }
}

impl<I: Initializer> fmt::Debug for BootstrapCoordinator<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapCoordinator")
            .field("install_dir", &self.config.install_dir)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
