//! Status view: food gauge, last feed label, feed trigger and size slider.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use feeder_types::format::last_feed_label;
use feeder_types::{FeedSize, Reading};

use crate::delay::SharedDelay;
use crate::error::Result;
use crate::guard::BusyGuard;
use crate::notify::{Notice, SharedNotifier};
use crate::traits::SharedApi;
use crate::views::{ActionOutcome, lock};

/// Label shown on the gauge while a refresh settles.
pub const UPDATING_LABEL: &str = "Updating…";
/// Label shown on the gauge when no reading is available.
pub const UNAVAILABLE_LABEL: &str = "Unavailable";
/// Trigger label while idle.
pub const FEED_LABEL: &str = "Feed";
/// Trigger label while a feed runs.
pub const FEEDING_LABEL: &str = "Feeding…";

/// Cosmetic waits of the status view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTimings {
    /// How long the gauge shows "Updating…" before re-reading.
    pub refresh_settle: Duration,
    /// Physical dispensing time before the trigger re-enables.
    pub feed_settle: Duration,
}

impl Default for StatusTimings {
    fn default() -> Self {
        Self {
            refresh_settle: Duration::from_millis(1000),
            feed_settle: Duration::from_millis(5000),
        }
    }
}

/// Food gauge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GaugeState {
    /// Last successful reading.
    pub percent: Option<u8>,
    /// Fill level drawn, 0-100. Forced to 100 while busy.
    pub fill: u8,
    pub busy: bool,
    /// The last read failed; `percent` is the previous value.
    pub stale: bool,
}

impl GaugeState {
    pub fn label(&self) -> String {
        match (self.busy, self.stale, self.percent) {
            (true, _, _) => UPDATING_LABEL.to_string(),
            (false, true, _) | (false, false, None) => UNAVAILABLE_LABEL.to_string(),
            (false, false, Some(percent)) => format!("{}%", percent),
        }
    }

    pub fn enabled(&self) -> bool {
        !self.busy
    }

    pub fn dimmed(&self) -> bool {
        self.busy
    }

    fn apply(&mut self, reading: Reading) {
        self.percent = Some(reading.percent);
        self.fill = reading.percent;
        self.stale = false;
    }

    fn enter_busy(&mut self) {
        self.busy = true;
        self.fill = 100;
    }

    fn leave_busy(&mut self) {
        self.busy = false;
        self.fill = self.percent.unwrap_or(0);
    }
}

/// Manual feed trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerState {
    pub label: &'static str,
    pub enabled: bool,
    pub dimmed: bool,
}

impl Default for TriggerState {
    fn default() -> Self {
        Self::idle()
    }
}

impl TriggerState {
    fn idle() -> Self {
        Self {
            label: FEED_LABEL,
            enabled: true,
            dimmed: false,
        }
    }

    fn feeding() -> Self {
        Self {
            label: FEEDING_LABEL,
            enabled: false,
            dimmed: true,
        }
    }
}

/// Render state of the status pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub gauge: GaugeState,
    pub last_feed: String,
    pub last_feed_stale: bool,
    pub trigger: TriggerState,
    pub feed_size: FeedSize,
}

impl StatusSnapshot {
    /// Text next to the feed-size slider.
    pub fn slider_label(&self) -> &'static str {
        self.feed_size.label()
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            gauge: GaugeState::default(),
            last_feed: "--".to_string(),
            last_feed_stale: false,
            trigger: TriggerState::idle(),
            feed_size: FeedSize::default(),
        }
    }
}

/// Controller for the status pane.
#[derive(Clone)]
pub struct StatusView {
    api: SharedApi,
    notifier: SharedNotifier,
    delay: SharedDelay,
    timings: StatusTimings,
    state: Arc<Mutex<StatusSnapshot>>,
    refreshing: Arc<AtomicBool>,
    feeding: Arc<AtomicBool>,
}

impl std::fmt::Debug for StatusView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusView")
            .field("timings", &self.timings)
            .field("state", &self.snapshot())
            .finish()
    }
}

impl StatusView {
    pub fn new(
        api: SharedApi,
        notifier: SharedNotifier,
        delay: SharedDelay,
        timings: StatusTimings,
    ) -> Self {
        Self {
            api,
            notifier,
            delay,
            timings,
            state: Arc::new(Mutex::new(StatusSnapshot::default())),
            refreshing: Arc::new(AtomicBool::new(false)),
            feeding: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        lock(&self.state).clone()
    }

    pub fn timings(&self) -> StatusTimings {
        self.timings
    }

    /// Initial load: reading and last feed, fetched concurrently.
    pub async fn load(&self) -> Result<()> {
        let (reading, last_feed) = tokio::join!(self.refresh_reading(), self.refresh_last_feed());
        reading?;
        last_feed
    }

    /// Fetch the reading and update gauge fill and label together.
    pub async fn refresh_reading(&self) -> Result<Reading> {
        match self.api.get_reading().await {
            Ok(reading) => {
                debug!("Food remaining: {}", reading);
                lock(&self.state).gauge.apply(reading);
                Ok(reading)
            }
            Err(e) => {
                warn!("Failed to read food level: {}", e);
                lock(&self.state).gauge.stale = true;
                Err(e)
            }
        }
    }

    /// Fetch the last feed and update its label.
    pub async fn refresh_last_feed(&self) -> Result<()> {
        match self.api.get_last_feed().await {
            Ok(entry) => {
                let label = last_feed_label(entry.as_ref());
                let mut state = lock(&self.state);
                state.last_feed = label;
                state.last_feed_stale = false;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to read last feed: {}", e);
                lock(&self.state).last_feed_stale = true;
                Err(e)
            }
        }
    }

    /// Show the busy gauge for the settle window, then re-read.
    pub async fn manual_refresh(&self) -> Result<ActionOutcome> {
        let Some(guard) = BusyGuard::try_acquire(&self.refreshing, "refresh") else {
            info!("Refresh already running, ignoring");
            return Ok(ActionOutcome::Ignored);
        };

        lock(&self.state).gauge.enter_busy();
        let state = Arc::clone(&self.state);
        let mut guard = guard.on_release(move || lock(&state).gauge.leave_busy());

        self.delay.sleep(self.timings.refresh_settle).await;
        guard.restore_now();

        let reading = self.refresh_reading().await;
        let last_feed = self.refresh_last_feed().await;
        drop(guard);

        reading?;
        last_feed?;
        Ok(ActionOutcome::Completed)
    }

    /// Dispense `size` now.
    ///
    /// The trigger stays disabled until the feed settle delay has passed, then
    /// the gauge refreshes. On failure the trigger re-enables immediately and
    /// the user is notified.
    pub async fn manual_feed(&self, size: FeedSize) -> Result<ActionOutcome> {
        let Some(guard) = BusyGuard::try_acquire(&self.feeding, "feed") else {
            info!("Feed already running, ignoring");
            return Ok(ActionOutcome::Ignored);
        };

        lock(&self.state).trigger = TriggerState::feeding();
        let state = Arc::clone(&self.state);
        let guard = guard.on_release(move || lock(&state).trigger = TriggerState::idle());

        info!("Manual feed, size {}", size);
        if let Err(e) = self.api.manual_feed(size).await {
            drop(guard);
            warn!("Manual feed failed: {}", e);
            self.notifier.notify(Notice::error(format!("Feed failed: {}", e)));
            return Err(e);
        }

        self.delay.sleep(self.timings.feed_settle).await;
        drop(guard);
        self.notifier.notify(Notice::info("Feeding complete"));

        self.manual_refresh().await?;
        Ok(ActionOutcome::Completed)
    }

    /// Feed with the size selected on the slider.
    pub async fn feed_selected(&self) -> Result<ActionOutcome> {
        let size = lock(&self.state).feed_size;
        self.manual_feed(size).await
    }

    pub fn set_feed_size(&self, size: FeedSize) {
        lock(&self.state).feed_size = size;
    }

    /// Move the slider one step; positive is larger. Saturates at the ends.
    pub fn step_feed_size(&self, step: i8) -> FeedSize {
        let mut state = lock(&self.state);
        state.feed_size = match step.signum() {
            1 => state.feed_size.larger(),
            -1 => state.feed_size.smaller(),
            _ => state.feed_size,
        };
        state.feed_size
    }

    pub fn is_feeding(&self) -> bool {
        self.feeding.load(std::sync::atomic::Ordering::Acquire)
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(std::sync::atomic::Ordering::Acquire)
    }
}
