//! Pane transition controller.
//!
//! The panel shows one pane at a time. Switching panes runs a two-phase
//! animation:
//!
//! ```text
//! Idle ──activate──▶ FadingOut ──delay──▶ Swapping ──delay──▶ FadingIn ──▶ Idle
//! ```
//!
//! The navigation indicator moves as soon as a switch starts. The outgoing
//! pane fades for its configured transition duration, then is hidden while
//! the target is revealed but still invisible. After a second equal delay the
//! target becomes active and fades in while its loader runs.
//!
//! Only one transition runs at a time; requests arriving before the target
//! has settled are rejected with [`PaneError::TransitionInProgress`]. A
//! pane's loader never runs twice concurrently.
//!
//! All state lives behind one mutex that is never held across an `.await`.
//! Renderers call [`PaneController::snapshot`].

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::delay::SharedDelay;
use crate::guard::BusyGuard;

/// Default duration of each animation phase.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

/// Lazy content loader run after a pane becomes active.
pub type Loader = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Identifier of a pane.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaneId(String);

impl PaneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PaneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Errors from pane operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PaneError {
    #[error("Unknown pane: {0}")]
    UnknownPane(PaneId),

    #[error("Pane transition in progress, ignoring switch to {0}")]
    TransitionInProgress(PaneId),
}

/// Result of a successful [`PaneController::activate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The target was already active. Nothing changed.
    AlreadyActive,
    /// The target is now active. `loader_ran` is false when the pane has no
    /// loader or its previous run had not finished.
    Switched { loader_ran: bool },
}

/// Visibility of a pane's content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    /// Displayed, animating out.
    FadingOut,
    /// Displayed but not yet visible.
    Revealed,
    Active,
}

impl Visibility {
    #[must_use]
    pub fn is_displayed(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Phase of the current pane transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    #[default]
    Idle,
    FadingOut,
    Swapping,
    /// Target is active and its loader is filling it.
    FadingIn,
}

impl TransitionPhase {
    /// Whether a new switch may start. A pane that is still fading in can be
    /// left without waiting for its loader.
    #[must_use]
    pub fn accepts_switch(self) -> bool {
        matches!(self, Self::Idle | Self::FadingIn)
    }
}

/// Configuration of one pane.
#[derive(Clone)]
pub struct PaneConfig {
    title: String,
    transition: Duration,
    loader: Option<Loader>,
}

impl fmt::Debug for PaneConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaneConfig")
            .field("title", &self.title)
            .field("transition", &self.transition)
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}

impl PaneConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            transition: DEFAULT_TRANSITION,
            loader: None,
        }
    }

    /// Duration of each animation phase when leaving this pane.
    #[must_use]
    pub fn transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    /// Async action run each time this pane is switched to.
    #[must_use]
    pub fn loader<F, Fut>(mut self, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.loader = Some(Arc::new(move || loader().boxed()));
        self
    }
}

struct PaneEntry {
    id: PaneId,
    config: PaneConfig,
    visibility: Visibility,
    nav_active: bool,
    loading: Arc<AtomicBool>,
}

#[derive(Default)]
struct UiState {
    panes: Vec<PaneEntry>,
    active: Option<usize>,
    phase: TransitionPhase,
    // Bumped by every switch so a stale loader cannot settle a newer one.
    generation: u64,
}

impl UiState {
    fn index_of(&self, id: &PaneId) -> Option<usize> {
        self.panes.iter().position(|p| &p.id == id)
    }
}

/// Read-only view of one pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSnapshot {
    pub id: PaneId,
    pub title: String,
    pub visibility: Visibility,
    pub nav_active: bool,
    pub loading: bool,
}

/// Read-only view of every pane, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSnapshot {
    pub panes: Vec<PaneSnapshot>,
    pub active: Option<PaneId>,
    pub phase: TransitionPhase,
}

impl UiSnapshot {
    /// Pane whose nav indicator is lit. Moves before the content does.
    pub fn selected(&self) -> Option<&PaneSnapshot> {
        self.panes.iter().find(|p| p.nav_active)
    }

    /// Pane currently displayed, if any.
    pub fn displayed(&self) -> Option<&PaneSnapshot> {
        self.panes.iter().find(|p| p.visibility.is_displayed())
    }

    /// Pane `offset` steps from the selected one, wrapping around.
    pub fn neighbor(&self, offset: isize) -> Option<PaneId> {
        let len = self.panes.len() as isize;
        if len == 0 {
            return None;
        }
        let current = self.panes.iter().position(|p| p.nav_active).unwrap_or(0) as isize;
        let index = (current + offset).rem_euclid(len) as usize;
        Some(self.panes[index].id.clone())
    }
}

/// Owns the panes, the active pane and the transition protocol.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct PaneController {
    state: Arc<Mutex<UiState>>,
    delay: SharedDelay,
}

impl fmt::Debug for PaneController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("PaneController")
            .field("active", &snapshot.active)
            .field("phase", &snapshot.phase)
            .finish()
    }
}

impl PaneController {
    pub fn new(delay: SharedDelay) -> Self {
        Self {
            state: Arc::new(Mutex::new(UiState::default())),
            delay,
        }
    }

    /// Register a pane. Registering an existing id replaces its config.
    #[must_use]
    pub fn with_pane(self, id: impl Into<PaneId>, config: PaneConfig) -> Self {
        let id = id.into();
        {
            let mut state = self.lock();
            match state.index_of(&id) {
                Some(index) => state.panes[index].config = config,
                None => state.panes.push(PaneEntry {
                    id,
                    config,
                    visibility: Visibility::Hidden,
                    nav_active: false,
                    loading: Arc::new(AtomicBool::new(false)),
                }),
            }
        }
        self
    }

    fn lock(&self) -> MutexGuard<'_, UiState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Show `default` and hide every other pane, without animation or loader.
    pub fn initialize(&self, default: &PaneId) -> Result<(), PaneError> {
        let mut state = self.lock();
        let index = state.index_of(default).ok_or_else(|| {
            warn!("Cannot initialize panes: unknown default pane {}", default);
            PaneError::UnknownPane(default.clone())
        })?;

        for (i, pane) in state.panes.iter_mut().enumerate() {
            let is_default = i == index;
            pane.visibility = if is_default {
                Visibility::Active
            } else {
                Visibility::Hidden
            };
            pane.nav_active = is_default;
        }
        state.active = Some(index);
        state.phase = TransitionPhase::Idle;
        state.generation += 1;
        debug!("Panes initialized, {} active", default);
        Ok(())
    }

    /// Switch to `target`, running the transition and then its loader.
    ///
    /// Resolves once the loader has finished. The returned future must be
    /// driven to completion; the panel spawns it on the runtime.
    pub async fn activate(&self, target: &PaneId) -> Result<Activation, PaneError> {
        let (index, generation, outgoing) = {
            let mut state = self.lock();
            let Some(index) = state.index_of(target) else {
                warn!("Ignoring switch to unknown pane {}", target);
                return Err(PaneError::UnknownPane(target.clone()));
            };
            if !state.phase.accepts_switch() {
                warn!("Transition in progress, ignoring switch to {}", target);
                return Err(PaneError::TransitionInProgress(target.clone()));
            }
            if state.active == Some(index) {
                debug!("Pane {} already active", target);
                return Ok(Activation::AlreadyActive);
            }

            info!("Switching to pane {}", target);
            state.generation += 1;
            let current = state.active;
            if let Some(current) = current {
                state.panes[current].nav_active = false;
            }
            state.panes[index].nav_active = true;

            let outgoing = current.map(|current| {
                state.panes[current].visibility = Visibility::FadingOut;
                state.phase = TransitionPhase::FadingOut;
                (current, state.panes[current].config.transition)
            });
            (index, state.generation, outgoing)
        };

        if let Some((current, transition)) = outgoing {
            self.delay.sleep(transition).await;
            {
                let mut state = self.lock();
                state.panes[current].visibility = Visibility::Hidden;
                state.panes[index].visibility = Visibility::Revealed;
                state.phase = TransitionPhase::Swapping;
            }
            debug!("Pane {} revealed", target);
            self.delay.sleep(transition).await;
        }

        let (loader, loading) = {
            let mut state = self.lock();
            state.phase = TransitionPhase::FadingIn;
            for (i, pane) in state.panes.iter_mut().enumerate() {
                if i != index {
                    pane.visibility = Visibility::Hidden;
                }
            }
            let pane = &mut state.panes[index];
            pane.visibility = Visibility::Active;
            let loader = pane.config.loader.clone();
            let loading = Arc::clone(&pane.loading);
            state.active = Some(index);
            (loader, loading)
        };

        // Stays FadingIn until the loader is done, unless another switch took over.
        let loader_ran = match loader {
            Some(loader) => match BusyGuard::try_acquire(&loading, "pane loader") {
                Some(_guard) => {
                    loader().await;
                    true
                }
                None => {
                    debug!("Loader for {} still running, not starting another", target);
                    false
                }
            },
            None => false,
        };

        let mut state = self.lock();
        if state.generation == generation && state.phase == TransitionPhase::FadingIn {
            state.phase = TransitionPhase::Idle;
            debug!("Pane {} settled", target);
        }
        Ok(Activation::Switched { loader_ran })
    }

    pub fn snapshot(&self) -> UiSnapshot {
        let state = self.lock();
        UiSnapshot {
            panes: state
                .panes
                .iter()
                .map(|pane| PaneSnapshot {
                    id: pane.id.clone(),
                    title: pane.config.title.clone(),
                    visibility: pane.visibility,
                    nav_active: pane.nav_active,
                    loading: pane.loading.load(Ordering::Acquire),
                })
                .collect(),
            active: state.active.map(|i| state.panes[i].id.clone()),
            phase: state.phase,
        }
    }

    pub fn active(&self) -> Option<PaneId> {
        let state = self.lock();
        state.active.map(|i| state.panes[i].id.clone())
    }

    pub fn is_transitioning(&self) -> bool {
        self.lock().phase != TransitionPhase::Idle
    }

    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.lock().panes.iter().map(|p| p.id.clone()).collect()
    }
}
