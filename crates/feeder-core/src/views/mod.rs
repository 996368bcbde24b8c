//! View controllers for the three panes.
//!
//! Each view owns its render state behind a mutex and exposes a snapshot for
//! front ends. Operations call the [`FeederApi`](crate::FeederApi), then
//! update the state; failures leave the previous state in place.

pub mod log;
pub mod schedule;
pub mod status;

use std::sync::{Mutex, MutexGuard};

/// Outcome of a user action that may be ignored while a previous run is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// A run of the same action was already in progress.
    Ignored,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
