//! Platform-agnostic types for the pet feeder control panel.
//!
//! This crate provides the data model shared by the device client
//! (feeder-core) and the front ends (feeder-cli, feeder-tui).
//!
//! # Features
//!
//! - Feed type and feed size enums with their wire codes and labels
//! - Records for readings, schedule entries and feed history
//! - Formatting helpers turning wire values into display text
//!
//! # Example
//!
//! ```
//! use feeder_types::{FeedSize, FeedType, ScheduledFeed};
//! use feeder_types::format::schedule_row;
//!
//! let entry = ScheduledFeed::new("14:30", FeedType::OneTime, FeedSize::Average);
//! assert_eq!(schedule_row(&entry), "2:30 PM | One-Time | Average");
//! ```

pub mod error;
pub mod format;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{FeedLogEntry, FeedSize, FeedType, LastFeedEntry, Reading, ScheduledFeed};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_cover_the_data_model() {
        let entry = ScheduledFeed::new("06:00", FeedType::Indefinite, FeedSize::Small);
        assert_eq!(entry.feed_type(), Some(FeedType::Indefinite));
        assert_eq!(entry.size(), Some(FeedSize::Small));
    }

    #[test]
    fn test_parse_error_messages() {
        let err = "25:00".parse::<FeedSize>().unwrap_err();
        assert!(err.to_string().contains("Invalid feed size"));

        let err = format::convert_time("25:00").unwrap_err();
        assert!(err.to_string().contains("25:00"));
    }
}
