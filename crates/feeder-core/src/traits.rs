//! Trait abstraction for the feeder API.
//!
//! This module provides the [`FeederApi`] trait that abstracts over the real
//! HTTP client and the mock feeder used in tests.

use std::sync::Arc;

use async_trait::async_trait;

use feeder_types::{FeedLogEntry, FeedSize, FeedType, LastFeedEntry, Reading, ScheduledFeed};

use crate::error::Result;

/// Trait abstracting feeder device operations.
///
/// Views only talk to the device through this trait, so they can be driven by
/// [`DeviceClient`](crate::DeviceClient) or by [`MockFeeder`](crate::MockFeeder).
///
/// # Example
///
/// ```ignore
/// use feeder_core::{FeederApi, Result};
///
/// async fn print_reading<A: FeederApi>(api: &A) -> Result<()> {
///     let reading = api.get_reading().await?;
///     println!("Food remaining: {}", reading);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait FeederApi: Send + Sync {
    // --- Reads ---

    /// Read the food-remaining percentage.
    async fn get_reading(&self) -> Result<Reading>;

    /// Read the most recent feed, `None` if the device never fed.
    async fn get_last_feed(&self) -> Result<Option<LastFeedEntry>>;

    /// Read every scheduled feed.
    async fn get_feed_times(&self) -> Result<Vec<ScheduledFeed>>;

    /// Read the feed history, oldest first.
    async fn get_feed_logs(&self) -> Result<Vec<FeedLogEntry>>;

    // --- Mutations ---

    /// Dispense food now.
    async fn manual_feed(&self, size: FeedSize) -> Result<()>;

    /// Add a schedule entry. `time` is a 24-hour `H:MM` or `HH:MM` string.
    async fn add_feed_time(&self, time: &str, feed_type: FeedType, size: FeedSize) -> Result<()>;

    /// Remove the schedule entry at `time`.
    async fn delete_feed_time(&self, time: &str) -> Result<()>;

    /// Cycle the device's camera processing mode.
    async fn toggle_camera(&self) -> Result<()>;
}

/// Shared handle to any [`FeederApi`] implementation.
pub type SharedApi = Arc<dyn FeederApi>;
