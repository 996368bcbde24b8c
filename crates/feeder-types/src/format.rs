//! Display formatting for feeder values.
//!
//! The device speaks 24-hour `HH:MM` times and integer codes; people read
//! 12-hour times and labels. Every function here is pure and total over its
//! documented input so views can call them without error plumbing.

use time::Time;
use time::format_description::FormatItem;
use time::macros::format_description;

use crate::error::{ParseError, ParseResult};
use crate::types::{FeedLogEntry, FeedSize, FeedType, LastFeedEntry, ScheduledFeed};

/// Label used for any code that does not map to a known value.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Label used when the device has never fed.
pub const NO_FEED_LABEL: &str = "N/A";

const WIRE_CLOCK: &[FormatItem<'static>] = format_description!("[hour]:[minute]");
const DISPLAY_CLOCK: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");

/// Parse a 24-hour `H:MM` or `HH:MM` clock time.
///
/// # Examples
///
/// ```
/// use feeder_types::format::parse_clock;
///
/// assert!(parse_clock("8:05").is_ok());
/// assert!(parse_clock("23:59").is_ok());
/// assert!(parse_clock("24:00").is_err());
/// assert!(parse_clock("8:5").is_err());
/// ```
pub fn parse_clock(input: &str) -> ParseResult<Time> {
    let invalid = || ParseError::InvalidTime(input.to_string());

    let (hours, minutes) = input.trim().split_once(':').ok_or_else(invalid)?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(hours) || hours.len() > 2 || !digits(minutes) || minutes.len() != 2 {
        return Err(invalid());
    }

    let hour: u8 = hours.parse().map_err(|_| invalid())?;
    let minute: u8 = minutes.parse().map_err(|_| invalid())?;
    Time::from_hms(hour, minute, 0).map_err(|_| invalid())
}

/// Normalize a 24-hour clock time to the zero-padded `HH:MM` wire form.
///
/// # Examples
///
/// ```
/// use feeder_types::format::normalize_clock;
///
/// assert_eq!(normalize_clock("8:00").unwrap(), "08:00");
/// assert_eq!(normalize_clock("14:30").unwrap(), "14:30");
/// ```
pub fn normalize_clock(input: &str) -> ParseResult<String> {
    let time = parse_clock(input)?;
    time.format(WIRE_CLOCK)
        .map_err(|_| ParseError::InvalidTime(input.to_string()))
}

/// Convert a 24-hour `H:MM`/`HH:MM` time to 12-hour display form.
///
/// # Examples
///
/// ```
/// use feeder_types::format::convert_time;
///
/// assert_eq!(convert_time("00:05").unwrap(), "12:05 AM");
/// assert_eq!(convert_time("12:00").unwrap(), "12:00 PM");
/// assert_eq!(convert_time("23:59").unwrap(), "11:59 PM");
/// assert_eq!(convert_time("8:00").unwrap(), "8:00 AM");
/// ```
pub fn convert_time(input: &str) -> ParseResult<String> {
    let time = parse_clock(input)?;
    time.format(DISPLAY_CLOCK)
        .map_err(|_| ParseError::InvalidTime(input.to_string()))
}

/// 12-hour display form, falling back to the raw text for unparseable input.
#[must_use]
pub fn display_time(input: &str) -> String {
    convert_time(input).unwrap_or_else(|_| input.to_string())
}

/// Label for a feed type code. Total: unknown codes map to `"Unknown"`.
#[must_use]
pub fn type_num_to_string(code: i64) -> &'static str {
    FeedType::from_code(code).map_or(UNKNOWN_LABEL, FeedType::label)
}

/// Label for a feed size code. Total: 0 and unknown codes map to `"Unknown"`.
#[must_use]
pub fn size_num_to_string(code: i64) -> &'static str {
    FeedSize::from_code(code).map_or(UNKNOWN_LABEL, FeedSize::label)
}

/// Row text for a schedule entry: `"2:30 PM | One-Time | Average"`.
#[must_use]
pub fn schedule_row(entry: &ScheduledFeed) -> String {
    format!(
        "{} | {} | {}",
        display_time(&entry.time),
        type_num_to_string(entry.type_code),
        size_num_to_string(entry.size_code)
    )
}

/// Row text for a feed log entry: `"2024-01-02 | 8:00 AM | One-Time | Large"`.
#[must_use]
pub fn log_row(entry: &FeedLogEntry) -> String {
    format!(
        "{} | {} | {} | {}",
        entry.date,
        display_time(&entry.time),
        type_num_to_string(entry.type_code),
        size_num_to_string(entry.size_code)
    )
}

/// Label for the last feed, `"N/A"` when the device has no feed recorded.
#[must_use]
pub fn last_feed_label(entry: Option<&LastFeedEntry>) -> String {
    match entry {
        Some(entry) => format!(
            "{} | {}",
            display_time(&entry.time),
            type_num_to_string(entry.type_code)
        ),
        None => NO_FEED_LABEL.to_string(),
    }
}
