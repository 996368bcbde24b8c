//! Mock feeder implementation for testing.
//!
//! This module provides a mock feeder that can be used for unit testing
//! without a device on the network.
//!
//! The [`MockFeeder`] implements the [`FeederApi`] trait, allowing it to be
//! used interchangeably with [`DeviceClient`](crate::DeviceClient) by the
//! views and the front ends.
//!
//! # Features
//!
//! - **Failure injection**: Make specific operations fail with a given error
//! - **Latency simulation**: Add artificial delays to simulate a slow device
//! - **Request recording**: Inspect every call in order, with its arguments
//!
//! [`RecordingDelay`] and [`RecordingNotifier`] are the matching test doubles
//! for [`Delay`] and [`Notifier`].

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use feeder_types::format::normalize_clock;
use feeder_types::{FeedLogEntry, FeedSize, FeedType, LastFeedEntry, Reading, ScheduledFeed};

use crate::delay::Delay;
use crate::error::{Error, Result};
use crate::notify::{Notice, Notifier};
use crate::traits::FeederApi;

/// Operations of [`FeederApi`], used to target failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    GetReading,
    GetLastFeed,
    GetFeedTimes,
    GetFeedLogs,
    ManualFeed,
    AddFeedTime,
    DeleteFeedTime,
    ToggleCamera,
}

/// A call received by the mock, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRequest {
    GetReading,
    GetLastFeed,
    GetFeedTimes,
    GetFeedLogs,
    ManualFeed {
        size: FeedSize,
    },
    AddFeedTime {
        time: String,
        feed_type: FeedType,
        size: FeedSize,
    },
    DeleteFeedTime {
        time: String,
    },
    ToggleCamera,
}

impl MockRequest {
    pub fn op(&self) -> MockOp {
        match self {
            Self::GetReading => MockOp::GetReading,
            Self::GetLastFeed => MockOp::GetLastFeed,
            Self::GetFeedTimes => MockOp::GetFeedTimes,
            Self::GetFeedLogs => MockOp::GetFeedLogs,
            Self::ManualFeed { .. } => MockOp::ManualFeed,
            Self::AddFeedTime { .. } => MockOp::AddFeedTime,
            Self::DeleteFeedTime { .. } => MockOp::DeleteFeedTime,
            Self::ToggleCamera => MockOp::ToggleCamera,
        }
    }
}

/// A mock feeder for testing.
///
/// # Example
///
/// ```
/// use feeder_core::{FeederApi, MockFeeder};
///
/// #[tokio::main]
/// async fn main() {
///     let feeder = MockFeeder::new().with_reading(42);
///     let reading = feeder.get_reading().await.unwrap();
///     assert_eq!(reading.percent, 42);
/// }
/// ```
pub struct MockFeeder {
    reading: Mutex<Option<Reading>>,
    last_feed: Mutex<Option<LastFeedEntry>>,
    feed_times: Mutex<Vec<ScheduledFeed>>,
    feed_logs: Mutex<Vec<FeedLogEntry>>,
    failures: Mutex<HashMap<MockOp, Error>>,
    requests: Mutex<Vec<MockRequest>>,
    /// Simulated latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
    camera_mode: AtomicU32,
}

impl std::fmt::Debug for MockFeeder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFeeder")
            .field("requests", &self.requests().len())
            .field("latency_ms", &self.latency_ms.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MockFeeder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeeder {
    /// Create a mock with 75% food, no feed history and an empty schedule.
    pub fn new() -> Self {
        Self {
            reading: Mutex::new(Some(Reading { percent: 75 })),
            last_feed: Mutex::new(None),
            feed_times: Mutex::new(Vec::new()),
            feed_logs: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            latency_ms: AtomicU64::new(0),
            camera_mode: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn with_reading(self, percent: u8) -> Self {
        self.set_reading(percent);
        self
    }

    #[must_use]
    pub fn with_last_feed(self, time: &str, feed_type: FeedType) -> Self {
        self.set_last_feed(Some(LastFeedEntry {
            time: time.to_string(),
            type_code: i64::from(feed_type.code()),
        }));
        self
    }

    #[must_use]
    pub fn with_feed_times(self, entries: Vec<ScheduledFeed>) -> Self {
        *lock(&self.feed_times) = entries;
        self
    }

    #[must_use]
    pub fn with_feed_logs(self, entries: Vec<FeedLogEntry>) -> Self {
        *lock(&self.feed_logs) = entries;
        self
    }

    /// Set the reported food-remaining percentage.
    pub fn set_reading(&self, percent: u8) {
        *lock(&self.reading) = Some(Reading {
            percent: percent.min(100),
        });
    }

    /// Make `get_reading` report a missing distance sensor.
    pub fn set_sensor_unavailable(&self) {
        *lock(&self.reading) = None;
    }

    pub fn set_last_feed(&self, entry: Option<LastFeedEntry>) {
        *lock(&self.last_feed) = entry;
    }

    /// Current schedule as the mock stores it.
    pub fn feed_times(&self) -> Vec<ScheduledFeed> {
        lock(&self.feed_times).clone()
    }

    /// Make `op` fail with `error` until [`clear_failure`](Self::clear_failure).
    pub fn fail_on(&self, op: MockOp, error: Error) {
        lock(&self.failures).insert(op, error);
    }

    pub fn clear_failure(&self, op: MockOp) {
        lock(&self.failures).remove(&op);
    }

    /// Set simulated latency for every operation.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<MockRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests received for `op`.
    pub fn count(&self, op: MockOp) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.op() == op)
            .count()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Number of camera mode toggles received.
    pub fn camera_mode(&self) -> u32 {
        self.camera_mode.load(Ordering::Relaxed)
    }

    async fn begin(&self, request: MockRequest) -> Result<()> {
        let op = request.op();
        lock(&self.requests).push(request);

        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        match lock(&self.failures).get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl FeederApi for MockFeeder {
    async fn get_reading(&self) -> Result<Reading> {
        self.begin(MockRequest::GetReading).await?;
        (*lock(&self.reading))
            .ok_or_else(|| Error::SensorUnavailable("Sensor not available".to_string()))
    }

    async fn get_last_feed(&self) -> Result<Option<LastFeedEntry>> {
        self.begin(MockRequest::GetLastFeed).await?;
        Ok(lock(&self.last_feed).clone())
    }

    async fn get_feed_times(&self) -> Result<Vec<ScheduledFeed>> {
        self.begin(MockRequest::GetFeedTimes).await?;
        Ok(self.feed_times())
    }

    async fn get_feed_logs(&self) -> Result<Vec<FeedLogEntry>> {
        self.begin(MockRequest::GetFeedLogs).await?;
        Ok(lock(&self.feed_logs).clone())
    }

    async fn manual_feed(&self, size: FeedSize) -> Result<()> {
        self.begin(MockRequest::ManualFeed { size }).await
    }

    async fn add_feed_time(&self, time: &str, feed_type: FeedType, size: FeedSize) -> Result<()> {
        let time = normalize_clock(time)?;
        self.begin(MockRequest::AddFeedTime {
            time: time.clone(),
            feed_type,
            size,
        })
        .await?;

        let mut feed_times = lock(&self.feed_times);
        feed_times.retain(|entry| entry.time != time);
        feed_times.push(ScheduledFeed::new(time, feed_type, size));
        feed_times.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(())
    }

    async fn delete_feed_time(&self, time: &str) -> Result<()> {
        self.begin(MockRequest::DeleteFeedTime {
            time: time.to_string(),
        })
        .await?;
        lock(&self.feed_times).retain(|entry| entry.time != time);
        Ok(())
    }

    async fn toggle_camera(&self) -> Result<()> {
        self.begin(MockRequest::ToggleCamera).await?;
        self.camera_mode.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Delay that records every requested duration.
///
/// By default it sleeps on the tokio clock so paused-time tests can observe
/// intermediate states; [`RecordingDelay::instant`] only yields.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    calls: Mutex<Vec<Duration>>,
    instant: bool,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instant() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            instant: true,
        }
    }

    pub fn calls(&self) -> Vec<Duration> {
        lock(&self.calls).clone()
    }

    pub fn total(&self) -> Duration {
        lock(&self.calls).iter().sum()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        lock(&self.calls).push(duration);
        if self.instant {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Notifier that keeps every notice for inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    pub fn errors(&self) -> Vec<Notice> {
        lock(&self.notices)
            .iter()
            .filter(|n| n.is_error())
            .cloned()
            .collect()
    }

    pub fn last(&self) -> Option<Notice> {
        lock(&self.notices).last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        lock(&self.notices).push(notice);
    }
}
