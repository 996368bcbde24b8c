//! Device client and panel controllers for the pet feeder control panel.
//!
//! This crate talks to the feeder's JSON HTTP API and drives the panel state
//! that the front ends render.
//!
//! # Features
//!
//! - HTTP client for the feeder API ([`DeviceClient`], `http-client` feature)
//! - [`FeederApi`] trait with a [`MockFeeder`] for tests
//! - Pane transition controller with a timed two-phase animation
//! - Status, schedule and log view controllers
//! - [`FeederPanel`] wiring everything together
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use feeder_core::{ChannelNotifier, DeviceClient, FeederPanel, PanelConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DeviceClient::new("http://localhost:5000")?;
//! let (notifier, _notices) = ChannelNotifier::new(32);
//! let panel = FeederPanel::new(Arc::new(client), Arc::new(notifier), PanelConfig::default());
//! panel.start().await?;
//!
//! let status = panel.status().snapshot();
//! println!("Food remaining: {}", status.gauge.label());
//! # Ok(())
//! # }
//! ```

pub mod delay;
pub mod error;
pub mod guard;
pub mod mock;
pub mod notify;
pub mod pane;
pub mod panel;
pub mod traits;
pub mod views;
pub mod wire;

#[cfg(feature = "http-client")]
pub mod client;

pub use delay::{Delay, SharedDelay, TokioDelay};
pub use error::{Error, Result};
pub use guard::BusyGuard;
pub use mock::{MockFeeder, MockOp, MockRequest, RecordingDelay, RecordingNotifier};
pub use notify::{ChannelNotifier, Notice, NoticeLevel, Notifier, SharedNotifier};
pub use pane::{
    Activation, Loader, PaneConfig, PaneController, PaneError, PaneId, PaneSnapshot,
    TransitionPhase, UiSnapshot, Visibility,
};
pub use panel::{FeederPanel, LOG_PANE, PanelConfig, SCHEDULE_PANE, STATUS_PANE};
pub use traits::{FeederApi, SharedApi};
pub use views::ActionOutcome;
pub use views::log::{LogSnapshot, LogView};
pub use views::schedule::{ScheduleForm, ScheduleRow, ScheduleSnapshot, ScheduleView};
pub use views::status::{GaugeState, StatusSnapshot, StatusTimings, StatusView, TriggerState};

#[cfg(feature = "http-client")]
pub use client::DeviceClient;

// Re-export the data model so front ends only need this crate.
pub use feeder_types;
pub use feeder_types::{FeedLogEntry, FeedSize, FeedType, LastFeedEntry, Reading, ScheduledFeed};
