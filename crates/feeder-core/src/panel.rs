//! The feeder panel: panes and views wired to one API.
//!
//! [`FeederPanel`] registers the status, schedule and log panes, attaches the
//! schedule and log loaders, and exposes the user actions the front ends
//! bind to keys and commands.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use feeder_types::FeedSize;

use crate::delay::{SharedDelay, TokioDelay};
use crate::error::Result;
use crate::notify::SharedNotifier;
use crate::pane::{Activation, DEFAULT_TRANSITION, PaneConfig, PaneController, PaneError, PaneId};
use crate::traits::SharedApi;
use crate::views::ActionOutcome;
use crate::views::log::LogView;
use crate::views::schedule::ScheduleView;
use crate::views::status::{StatusTimings, StatusView};

pub const STATUS_PANE: &str = "status";
pub const SCHEDULE_PANE: &str = "schedule";
pub const LOG_PANE: &str = "log";

/// Panel configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Duration of each pane animation phase.
    pub transition: Duration,
    pub timings: StatusTimings,
    pub default_pane: PaneId,
    pub default_feed_size: FeedSize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            transition: DEFAULT_TRANSITION,
            timings: StatusTimings::default(),
            default_pane: PaneId::from(STATUS_PANE),
            default_feed_size: FeedSize::default(),
        }
    }
}

/// The whole control panel. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct FeederPanel {
    panes: PaneController,
    status: StatusView,
    schedule: ScheduleView,
    log: LogView,
    default_pane: PaneId,
}

impl FeederPanel {
    /// Create a panel using real timers.
    pub fn new(api: SharedApi, notifier: SharedNotifier, config: PanelConfig) -> Self {
        Self::with_delay(api, notifier, Arc::new(TokioDelay), config)
    }

    /// Create a panel with an injected delay.
    pub fn with_delay(
        api: SharedApi,
        notifier: SharedNotifier,
        delay: SharedDelay,
        config: PanelConfig,
    ) -> Self {
        let status = StatusView::new(
            Arc::clone(&api),
            Arc::clone(&notifier),
            Arc::clone(&delay),
            config.timings,
        );
        status.set_feed_size(config.default_feed_size);
        let schedule = ScheduleView::new(Arc::clone(&api), notifier);
        let log = LogView::new(api);

        let schedule_loader = schedule.clone();
        let log_loader = log.clone();
        let panes = PaneController::new(delay)
            .with_pane(
                STATUS_PANE,
                PaneConfig::new("Status").transition(config.transition),
            )
            .with_pane(
                SCHEDULE_PANE,
                PaneConfig::new("Schedule")
                    .transition(config.transition)
                    .loader(move || {
                        let view = schedule_loader.clone();
                        async move {
                            // Errors are recorded on the view and notified.
                            let _ = view.display_feed_times().await;
                        }
                    }),
            )
            .with_pane(
                LOG_PANE,
                PaneConfig::new("Feed Log")
                    .transition(config.transition)
                    .loader(move || {
                        let view = log_loader.clone();
                        async move {
                            let _ = view.display_feed_logs().await;
                        }
                    }),
            );

        Self {
            panes,
            status,
            schedule,
            log,
            default_pane: config.default_pane,
        }
    }

    /// Show the default pane and load the status view.
    ///
    /// A failed status read leaves the gauge unavailable but does not fail
    /// start-up. Only an unknown default pane is an error.
    pub async fn start(&self) -> Result<()> {
        self.panes.initialize(&self.default_pane)?;
        info!("Panel started on {}", self.default_pane);

        if let Err(e) = self.status.load().await {
            warn!("Initial status load failed: {}", e);
        }
        if self.default_pane.as_str() != STATUS_PANE {
            let _ = self.refresh_pane(&self.default_pane).await;
        }
        Ok(())
    }

    pub async fn activate(&self, pane: &PaneId) -> std::result::Result<Activation, PaneError> {
        self.panes.activate(pane).await
    }

    /// Re-run the refresh action of `pane`.
    pub async fn refresh_pane(&self, pane: &PaneId) -> Result<()> {
        debug!("Refreshing pane {}", pane);
        match pane.as_str() {
            STATUS_PANE => self.status.manual_refresh().await.map(|_| ()),
            SCHEDULE_PANE => self.schedule.display_feed_times().await.map(|_| ()),
            LOG_PANE => self.log.display_feed_logs().await.map(|_| ()),
            _ => Err(PaneError::UnknownPane(pane.clone()).into()),
        }
    }

    /// Refresh whichever pane is active.
    pub async fn refresh_active(&self) -> Result<()> {
        match self.panes.active() {
            Some(pane) => self.refresh_pane(&pane).await,
            None => Ok(()),
        }
    }

    /// Feed with the slider's size.
    pub async fn feed(&self) -> Result<ActionOutcome> {
        self.status.feed_selected().await
    }

    pub fn panes(&self) -> &PaneController {
        &self.panes
    }

    pub fn status(&self) -> &StatusView {
        &self.status
    }

    pub fn schedule(&self) -> &ScheduleView {
        &self.schedule
    }

    pub fn log(&self) -> &LogView {
        &self.log
    }
}
