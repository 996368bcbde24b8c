//! Busy guard for single-flight user actions.
//!
//! A [`BusyGuard`] marks an action as running and clears the mark when it goes
//! out of scope, including on early return and on panic. An optional restore
//! hook runs first, which the status view uses to re-enable its widgets.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

type RestoreHook = Box<dyn FnOnce() + Send>;

/// A guard that clears a busy flag when dropped.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use feeder_core::BusyGuard;
///
/// let busy = Arc::new(AtomicBool::new(false));
/// {
///     let _guard = BusyGuard::try_acquire(&busy, "feed").unwrap();
///     assert!(busy.load(Ordering::SeqCst));
///     assert!(BusyGuard::try_acquire(&busy, "feed").is_none());
/// }
/// assert!(!busy.load(Ordering::SeqCst));
/// ```
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
    name: &'static str,
    on_release: Option<RestoreHook>,
}

impl BusyGuard {
    /// Mark `flag` busy, or return `None` if it already is.
    pub fn try_acquire(flag: &Arc<AtomicBool>, name: &'static str) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        debug!("{} started", name);
        Some(Self {
            flag: Arc::clone(flag),
            name,
            on_release: None,
        })
    }

    /// Run `hook` when the guard is released.
    #[must_use]
    pub fn on_release(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_release = Some(Box::new(hook));
        self
    }

    /// Run the restore hook now instead of at drop. The flag stays set.
    pub fn restore_now(&mut self) {
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.restore_now();
        self.flag.store(false, Ordering::Release);
        debug!("{} finished", self.name);
    }
}

impl std::fmt::Debug for BusyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusyGuard")
            .field("name", &self.name)
            .field("restore_pending", &self.on_release.is_some())
            .finish()
    }
}
