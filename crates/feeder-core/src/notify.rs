//! User notifications.
//!
//! Views report outcomes of user actions ("Feeding complete", server errors)
//! through a [`Notifier`]. The TUI drains a [`ChannelNotifier`] and shows
//! errors as a blocking popup and info as a status line message.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    /// Must be acknowledged by the user.
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Sink for user-visible notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

pub type SharedNotifier = Arc<dyn Notifier>;

/// Notifier that forwards notices over a bounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<Notice>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver the front end drains.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notice>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.tx.try_send(notice) {
            warn!("Dropping notice: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_notifier_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new(4);
        notifier.notify(Notice::info("Feeding complete"));
        notifier.notify(Notice::error("Server error 500"));

        assert_eq!(rx.recv().await, Some(Notice::info("Feeding complete")));
        let second = rx.recv().await.unwrap();
        assert!(second.is_error());
    }

    #[tokio::test]
    async fn test_channel_notifier_full_does_not_block() {
        let (notifier, mut rx) = ChannelNotifier::new(1);
        notifier.notify(Notice::info("one"));
        notifier.notify(Notice::info("two"));

        assert_eq!(rx.recv().await, Some(Notice::info("one")));
        assert!(rx.try_recv().is_err());
    }
}
