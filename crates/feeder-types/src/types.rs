//! Core types for pet feeder data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// How a scheduled feed repeats.
///
/// Transmitted on the wire as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", try_from = "u8"))]
#[repr(u8)]
pub enum FeedType {
    /// Repeats every day at the scheduled time.
    Indefinite = 0,
    /// Fires once, then the server drops it.
    OneTime = 1,
}

impl FeedType {
    /// All feed types in code order.
    pub const ALL: [FeedType; 2] = [FeedType::Indefinite, FeedType::OneTime];

    /// Integer code used on the wire.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FeedType::Indefinite => "Indefinite",
            FeedType::OneTime => "One-Time",
        }
    }

    /// Look up a feed type by a wire code of any integer width.
    ///
    /// # Examples
    ///
    /// ```
    /// use feeder_types::FeedType;
    ///
    /// assert_eq!(FeedType::from_code(1), Some(FeedType::OneTime));
    /// assert_eq!(FeedType::from_code(7), None);
    /// ```
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(FeedType::Indefinite),
            1 => Some(FeedType::OneTime),
            _ => None,
        }
    }
}

impl TryFrom<u8> for FeedType {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        FeedType::from_code(i64::from(value)).ok_or_else(|| ParseError::InvalidFeedType(value.to_string()))
    }
}

impl From<FeedType> for u8 {
    fn from(value: FeedType) -> Self {
        value.code()
    }
}

impl FromStr for FeedType {
    type Err = ParseError;

    /// Parse a feed type from a code (`"0"`, `"1"`) or a name.
    ///
    /// # Examples
    ///
    /// ```
    /// use feeder_types::FeedType;
    ///
    /// assert_eq!("onetime".parse::<FeedType>(), Ok(FeedType::OneTime));
    /// assert_eq!("One-Time".parse::<FeedType>(), Ok(FeedType::OneTime));
    /// assert_eq!("0".parse::<FeedType>(), Ok(FeedType::Indefinite));
    /// assert!("weekly".parse::<FeedType>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "indefinite" | "daily" => Ok(FeedType::Indefinite),
            "1" | "onetime" | "one-time" | "once" => Ok(FeedType::OneTime),
            _ => Err(ParseError::InvalidFeedType(s.to_string())),
        }
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Portion dispensed by a feed.
///
/// Transmitted on the wire as an integer code from 1 to 5. The server turns
/// the size into motor run time, so the ordering is meaningful.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", try_from = "u8"))]
#[repr(u8)]
pub enum FeedSize {
    XSmall = 1,
    Small = 2,
    #[default]
    Average = 3,
    Large = 4,
    XLarge = 5,
}

impl FeedSize {
    /// All feed sizes from smallest to largest.
    pub const ALL: [FeedSize; 5] = [
        FeedSize::XSmall,
        FeedSize::Small,
        FeedSize::Average,
        FeedSize::Large,
        FeedSize::XLarge,
    ];

    /// Integer code used on the wire.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FeedSize::XSmall => "X-Small",
            FeedSize::Small => "Small",
            FeedSize::Average => "Average",
            FeedSize::Large => "Large",
            FeedSize::XLarge => "X-Large",
        }
    }

    /// Look up a feed size by a wire code of any integer width.
    ///
    /// # Examples
    ///
    /// ```
    /// use feeder_types::FeedSize;
    ///
    /// assert_eq!(FeedSize::from_code(3), Some(FeedSize::Average));
    /// assert_eq!(FeedSize::from_code(0), None);
    /// ```
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(FeedSize::XSmall),
            2 => Some(FeedSize::Small),
            3 => Some(FeedSize::Average),
            4 => Some(FeedSize::Large),
            5 => Some(FeedSize::XLarge),
            _ => None,
        }
    }

    /// Next larger size, saturating at [`FeedSize::XLarge`].
    #[must_use]
    pub fn larger(self) -> Self {
        FeedSize::from_code(i64::from(self.code()) + 1).unwrap_or(FeedSize::XLarge)
    }

    /// Next smaller size, saturating at [`FeedSize::XSmall`].
    #[must_use]
    pub fn smaller(self) -> Self {
        FeedSize::from_code(i64::from(self.code()) - 1).unwrap_or(FeedSize::XSmall)
    }
}

impl TryFrom<u8> for FeedSize {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        FeedSize::from_code(i64::from(value)).ok_or_else(|| ParseError::InvalidFeedSize(value.to_string()))
    }
}

impl From<FeedSize> for u8 {
    fn from(value: FeedSize) -> Self {
        value.code()
    }
}

impl FromStr for FeedSize {
    type Err = ParseError;

    /// Parse a feed size from a code (`"1"`..`"5"`) or a name.
    ///
    /// # Examples
    ///
    /// ```
    /// use feeder_types::FeedSize;
    ///
    /// assert_eq!("3".parse::<FeedSize>(), Ok(FeedSize::Average));
    /// assert_eq!("x-large".parse::<FeedSize>(), Ok(FeedSize::XLarge));
    /// assert!("6".parse::<FeedSize>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "xsmall" | "x-small" => Ok(FeedSize::XSmall),
            "2" | "small" => Ok(FeedSize::Small),
            "3" | "average" | "medium" => Ok(FeedSize::Average),
            "4" | "large" => Ok(FeedSize::Large),
            "5" | "xlarge" | "x-large" => Ok(FeedSize::XLarge),
            _ => Err(ParseError::InvalidFeedSize(s.to_string())),
        }
    }
}

impl fmt::Display for FeedSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Food remaining in the hopper, as reported by the distance sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Food remaining (0-100).
    pub percent: u8,
}

impl Reading {
    /// Build a reading from a raw sensor percentage, rounding and clamping to 0-100.
    ///
    /// Returns `None` for NaN or infinite input.
    ///
    /// # Examples
    ///
    /// ```
    /// use feeder_types::Reading;
    ///
    /// assert_eq!(Reading::from_percent(59.6).map(|r| r.percent), Some(60));
    /// assert_eq!(Reading::from_percent(140.0).map(|r| r.percent), Some(100));
    /// assert_eq!(Reading::from_percent(-3.0).map(|r| r.percent), Some(0));
    /// ```
    #[must_use]
    pub fn from_percent(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        let percent = raw.round().clamp(0.0, 100.0) as u8;
        Some(Self { percent })
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent)
    }
}

/// The most recent feed the device recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LastFeedEntry {
    /// 24-hour `HH:MM` time.
    pub time: String,
    /// Raw feed type code.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_code: i64,
}

impl LastFeedEntry {
    /// Typed feed type, if the code is known.
    #[must_use]
    pub fn feed_type(&self) -> Option<FeedType> {
        FeedType::from_code(self.type_code)
    }
}

/// A server-persisted schedule entry. `time` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduledFeed {
    /// 24-hour `HH:MM` time.
    pub time: String,
    /// Raw feed type code.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_code: i64,
    /// Raw feed size code.
    #[cfg_attr(feature = "serde", serde(rename = "size"))]
    pub size_code: i64,
}

impl ScheduledFeed {
    /// Create an entry from typed values.
    pub fn new(time: impl Into<String>, feed_type: FeedType, size: FeedSize) -> Self {
        Self {
            time: time.into(),
            type_code: i64::from(feed_type.code()),
            size_code: i64::from(size.code()),
        }
    }

    /// Typed feed type, if the code is known.
    #[must_use]
    pub fn feed_type(&self) -> Option<FeedType> {
        FeedType::from_code(self.type_code)
    }

    /// Typed feed size, if the code is known.
    #[must_use]
    pub fn size(&self) -> Option<FeedSize> {
        FeedSize::from_code(self.size_code)
    }
}

/// One dispensing event from the device's feed history.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeedLogEntry {
    /// Date as sent by the server (`YYYY-MM-DD`).
    pub date: String,
    /// 24-hour `HH:MM` time.
    pub time: String,
    /// Raw feed type code.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_code: i64,
    /// Raw feed size code.
    #[cfg_attr(feature = "serde", serde(rename = "size"))]
    pub size_code: i64,
}

impl FeedLogEntry {
    /// Typed feed type, if the code is known.
    #[must_use]
    pub fn feed_type(&self) -> Option<FeedType> {
        FeedType::from_code(self.type_code)
    }

    /// Typed feed size, if the code is known.
    #[must_use]
    pub fn size(&self) -> Option<FeedSize> {
        FeedSize::from_code(self.size_code)
    }
}
