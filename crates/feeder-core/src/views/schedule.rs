//! Schedule view: list of scheduled feeds with add and remove.
//!
//! The list is only ever replaced by a full re-fetch, after loading and after
//! every successful mutation.

use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use feeder_types::format::{display_time, normalize_clock, schedule_row};
use feeder_types::{FeedSize, FeedType, ScheduledFeed};

use crate::error::{Error, Result};
use crate::guard::BusyGuard;
use crate::notify::{Notice, SharedNotifier};
use crate::traits::SharedApi;
use crate::views::{ActionOutcome, lock};

/// Raw inputs of the add-entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleForm {
    /// 24-hour `H:MM` or `HH:MM`.
    pub time: String,
    /// `0`/`1` or a feed type name.
    pub feed_type: String,
    /// `1`-`5` or a feed size name.
    pub size: String,
}

impl ScheduleForm {
    pub fn new(
        time: impl Into<String>,
        feed_type: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            time: time.into(),
            feed_type: feed_type.into(),
            size: size.into(),
        }
    }

    /// Validate every field, returning the wire time and typed values.
    pub fn validate(&self) -> Result<(String, FeedType, FeedSize)> {
        if self.time.trim().is_empty() {
            return Err(Error::Validation("Feed time is required".to_string()));
        }
        let time = normalize_clock(&self.time)?;
        let feed_type = self.feed_type.parse::<FeedType>()?;
        let size = self.size.parse::<FeedSize>()?;
        Ok((time, feed_type, size))
    }
}

/// One rendered schedule entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    /// Wire time, the entry's key.
    pub time: String,
    pub text: String,
    /// A removal of this row is in flight.
    pub removing: bool,
}

/// Render state of the schedule pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    pub rows: Vec<ScheduleRow>,
    /// At least one fetch has succeeded.
    pub loaded: bool,
    /// Message of the last failed fetch, cleared by the next success.
    pub error: Option<String>,
    pub form: ScheduleForm,
}

#[derive(Debug, Default)]
struct ScheduleState {
    entries: Vec<ScheduledFeed>,
    loaded: bool,
    error: Option<String>,
    form: ScheduleForm,
    removing: HashSet<String>,
}

impl ScheduleState {
    fn snapshot(&self) -> ScheduleSnapshot {
        ScheduleSnapshot {
            rows: self
                .entries
                .iter()
                .map(|entry| ScheduleRow {
                    time: entry.time.clone(),
                    text: schedule_row(entry),
                    removing: self.removing.contains(&entry.time),
                })
                .collect(),
            loaded: self.loaded,
            error: self.error.clone(),
            form: self.form.clone(),
        }
    }
}

/// Controller for the schedule pane.
#[derive(Clone)]
pub struct ScheduleView {
    api: SharedApi,
    notifier: SharedNotifier,
    state: Arc<Mutex<ScheduleState>>,
    adding: Arc<AtomicBool>,
}

impl std::fmt::Debug for ScheduleView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleView")
            .field("state", &self.snapshot())
            .finish()
    }
}

impl ScheduleView {
    pub fn new(api: SharedApi, notifier: SharedNotifier) -> Self {
        Self {
            api,
            notifier,
            state: Arc::new(Mutex::new(ScheduleState::default())),
            adding: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn snapshot(&self) -> ScheduleSnapshot {
        lock(&self.state).snapshot()
    }

    /// Replace the form inputs.
    pub fn set_form(&self, form: ScheduleForm) {
        lock(&self.state).form = form;
    }

    /// Fetch the schedule and replace the rows. Returns the row count.
    pub async fn display_feed_times(&self) -> Result<usize> {
        match self.api.get_feed_times().await {
            Ok(entries) => {
                let count = entries.len();
                let mut state = lock(&self.state);
                state.entries = entries;
                state.loaded = true;
                state.error = None;
                Ok(count)
            }
            Err(e) => {
                warn!("Failed to load feed times: {}", e);
                lock(&self.state).error = Some(e.to_string());
                self.notifier
                    .notify(Notice::error(format!("Could not load feed times: {}", e)));
                Err(e)
            }
        }
    }

    /// Submit `form`: validate, add the entry, then re-fetch.
    ///
    /// Invalid input is rejected before any request. On success the form is
    /// cleared; on failure it keeps what the user typed.
    pub async fn add_feed_time(&self, form: ScheduleForm) -> Result<ActionOutcome> {
        let Some(_guard) = BusyGuard::try_acquire(&self.adding, "add feed time") else {
            info!("Add already running, ignoring");
            return Ok(ActionOutcome::Ignored);
        };
        self.set_form(form.clone());

        let (time, feed_type, size) = match form.validate() {
            Ok(values) => values,
            Err(e) => {
                warn!("Rejected feed time: {}", e);
                self.notifier.notify(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        info!("Adding feed time {} ({}, {})", time, feed_type, size);
        if let Err(e) = self.api.add_feed_time(&time, feed_type, size).await {
            warn!("Failed to add feed time: {}", e);
            self.notifier
                .notify(Notice::error(format!("Could not add feed time: {}", e)));
            return Err(e);
        }

        lock(&self.state).form = ScheduleForm::default();
        self.notifier.notify(Notice::info(format!(
            "Added feed time {}",
            display_time(&time)
        )));
        self.display_feed_times().await?;
        Ok(ActionOutcome::Completed)
    }

    /// Remove the entry at `time`, then re-fetch.
    ///
    /// Ignored while a removal of the same entry is in flight.
    pub async fn remove_feed_time(&self, time: &str) -> Result<ActionOutcome> {
        if !lock(&self.state).removing.insert(time.to_string()) {
            info!("Removal of {} already running, ignoring", time);
            return Ok(ActionOutcome::Ignored);
        }

        info!("Removing feed time {}", time);
        let result = self.api.delete_feed_time(time).await;
        lock(&self.state).removing.remove(time);

        if let Err(e) = result {
            warn!("Failed to remove feed time {}: {}", time, e);
            self.notifier
                .notify(Notice::error(format!("Could not remove feed time: {}", e)));
            return Err(e);
        }

        self.notifier.notify(Notice::info(format!(
            "Removed feed time {}",
            display_time(time)
        )));
        self.display_feed_times().await?;
        Ok(ActionOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockFeeder, MockOp, MockRequest, RecordingNotifier};
    use std::time::Duration;

    fn view(api: &Arc<MockFeeder>) -> (ScheduleView, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (ScheduleView::new(api.clone(), notifier.clone()), notifier)
    }

    fn texts(snapshot: &ScheduleSnapshot) -> Vec<&str> {
        snapshot.rows.iter().map(|r| r.text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_display_feed_times_renders_rows() {
        let api = Arc::new(MockFeeder::new().with_feed_times(vec![
            ScheduledFeed::new("07:00", FeedType::Indefinite, FeedSize::Small),
            ScheduledFeed {
                time: "19:30".to_string(),
                type_code: 7,
                size_code: 0,
            },
        ]));
        let (view, _) = view(&api);

        assert_eq!(view.display_feed_times().await.unwrap(), 2);
        let snapshot = view.snapshot();
        assert!(snapshot.loaded);
        assert_eq!(
            texts(&snapshot),
            ["7:00 AM | Indefinite | Small", "7:30 PM | Unknown | Unknown"]
        );
    }

    #[tokio::test]
    async fn test_add_feed_time_posts_and_refetches() {
        let api = Arc::new(MockFeeder::new());
        let (view, notifier) = view(&api);

        let outcome = view
            .add_feed_time(ScheduleForm::new("14:30", "onetime", "3"))
            .await
            .unwrap();
        assert_eq!(outcome, ActionOutcome::Completed);

        assert_eq!(
            api.requests(),
            vec![
                MockRequest::AddFeedTime {
                    time: "14:30".to_string(),
                    feed_type: FeedType::OneTime,
                    size: FeedSize::Average,
                },
                MockRequest::GetFeedTimes,
            ]
        );
        let snapshot = view.snapshot();
        assert_eq!(texts(&snapshot), ["2:30 PM | One-Time | Average"]);
        assert_eq!(snapshot.form, ScheduleForm::default());
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_add_feed_time_pads_short_hour() {
        let api = Arc::new(MockFeeder::new());
        let (view, _) = view(&api);
        view.add_feed_time(ScheduleForm::new("8:00", "0", "large"))
            .await
            .unwrap();
        assert_eq!(api.feed_times()[0].time, "08:00");
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let api = Arc::new(MockFeeder::new());
        let (view, notifier) = view(&api);

        for form in [
            ScheduleForm::new("", "0", "3"),
            ScheduleForm::new("25:00", "0", "3"),
            ScheduleForm::new("14:30", "weekly", "3"),
            ScheduleForm::new("14:30", "1", "0"),
        ] {
            let err = view.add_feed_time(form.clone()).await.unwrap_err();
            assert!(err.is_validation(), "{form:?} should fail validation");
            assert_eq!(view.snapshot().form, form);
        }

        assert!(api.requests().is_empty());
        assert_eq!(notifier.errors().len(), 4);
    }

    #[tokio::test]
    async fn test_add_failure_keeps_form_and_rows() {
        let api = Arc::new(MockFeeder::new().with_feed_times(vec![ScheduledFeed::new(
            "06:00",
            FeedType::Indefinite,
            FeedSize::Average,
        )]));
        let (view, notifier) = view(&api);
        view.display_feed_times().await.unwrap();

        api.fail_on(MockOp::AddFeedTime, Error::server(500, "Internal Server Error"));
        let form = ScheduleForm::new("12:00", "1", "2");
        assert!(view.add_feed_time(form.clone()).await.is_err());

        let snapshot = view.snapshot();
        assert_eq!(snapshot.form, form);
        assert_eq!(snapshot.rows.len(), 1);
        assert!(notifier.last().unwrap().message.contains("500"));
    }

    #[tokio::test]
    async fn test_remove_refetches_list() {
        let api = Arc::new(MockFeeder::new().with_feed_times(vec![
            ScheduledFeed::new("07:00", FeedType::Indefinite, FeedSize::Small),
            ScheduledFeed::new("19:00", FeedType::Indefinite, FeedSize::Large),
        ]));
        let (view, notifier) = view(&api);
        view.display_feed_times().await.unwrap();

        view.remove_feed_time("07:00").await.unwrap();
        let snapshot = view.snapshot();
        assert_eq!(texts(&snapshot), ["7:00 PM | Indefinite | Large"]);
        assert_eq!(api.count(MockOp::GetFeedTimes), 2);
        assert_eq!(
            notifier.last(),
            Some(Notice::info("Removed feed time 7:00 AM"))
        );
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_rows() {
        let api = Arc::new(MockFeeder::new().with_feed_times(vec![ScheduledFeed::new(
            "07:00",
            FeedType::Indefinite,
            FeedSize::Small,
        )]));
        let (view, _) = view(&api);
        view.display_feed_times().await.unwrap();

        api.fail_on(
            MockOp::DeleteFeedTime,
            Error::Network {
                url: "http://feeder.local".to_string(),
                message: "connection reset".to_string(),
            },
        );
        assert!(view.remove_feed_time("07:00").await.is_err());

        let snapshot = view.snapshot();
        assert_eq!(snapshot.rows.len(), 1);
        assert!(!snapshot.rows[0].removing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_in_flight_is_ignored() {
        let api = Arc::new(MockFeeder::new().with_feed_times(vec![ScheduledFeed::new(
            "07:00",
            FeedType::Indefinite,
            FeedSize::Small,
        )]));
        let (view, _) = view(&api);
        view.display_feed_times().await.unwrap();
        api.set_latency(Duration::from_millis(200));

        let task = tokio::spawn({
            let view = view.clone();
            async move { view.remove_feed_time("07:00").await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(view.snapshot().rows[0].removing);

        assert_eq!(
            view.remove_feed_time("07:00").await,
            Ok(ActionOutcome::Ignored)
        );
        assert_eq!(task.await.unwrap(), Ok(ActionOutcome::Completed));
        assert_eq!(api.count(MockOp::DeleteFeedTime), 1);
        assert!(view.snapshot().rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_records_error() {
        let api = Arc::new(MockFeeder::new());
        let (view, notifier) = view(&api);
        api.fail_on(MockOp::GetFeedTimes, Error::server(502, "Bad Gateway"));

        assert!(view.display_feed_times().await.is_err());
        let snapshot = view.snapshot();
        assert!(!snapshot.loaded);
        assert!(snapshot.error.unwrap().contains("502"));
        assert_eq!(notifier.errors().len(), 1);

        api.clear_failure(MockOp::GetFeedTimes);
        view.display_feed_times().await.unwrap();
        assert_eq!(view.snapshot().error, None);
    }
}
