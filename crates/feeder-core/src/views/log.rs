//! Log view: read-only feed history, newest first.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use feeder_types::FeedLogEntry;
use feeder_types::format::log_row;

use crate::error::Result;
use crate::traits::SharedApi;
use crate::views::lock;

/// Render state of the log pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSnapshot {
    /// Row texts, newest first.
    pub rows: Vec<String>,
    pub entries: Vec<FeedLogEntry>,
    pub loaded: bool,
    pub error: Option<String>,
}

/// Controller for the log pane.
#[derive(Clone)]
pub struct LogView {
    api: SharedApi,
    state: Arc<Mutex<LogSnapshot>>,
}

impl std::fmt::Debug for LogView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogView")
            .field("rows", &self.snapshot().rows.len())
            .finish()
    }
}

impl LogView {
    pub fn new(api: SharedApi) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(LogSnapshot::default())),
        }
    }

    pub fn snapshot(&self) -> LogSnapshot {
        lock(&self.state).clone()
    }

    /// Fetch the history and render it.
    ///
    /// The server sends oldest first; each entry is inserted at the front, so
    /// the list reads newest first without sorting.
    pub async fn display_feed_logs(&self) -> Result<usize> {
        let entries = match self.api.get_feed_logs().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load feed log: {}", e);
                lock(&self.state).error = Some(e.to_string());
                return Err(e);
            }
        };

        let mut ordered = VecDeque::with_capacity(entries.len());
        for entry in entries {
            ordered.push_front(entry);
        }
        let entries: Vec<_> = ordered.into();
        debug!("Loaded {} feed log entries", entries.len());

        let mut state = lock(&self.state);
        state.rows = entries.iter().map(log_row).collect();
        state.entries = entries;
        state.loaded = true;
        state.error = None;
        Ok(state.rows.len())
    }
}
