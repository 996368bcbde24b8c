//! Error types for parsing feeder values in feeder-types.

use thiserror::Error;

/// Errors that can occur when parsing feeder values from user input or wire data.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A clock time was not a valid 24-hour `H:MM` / `HH:MM` string.
    #[error("Invalid time '{0}': expected 24-hour HH:MM")]
    InvalidTime(String),

    /// A feed type was not one of the known codes or names.
    #[error("Invalid feed type '{0}': expected indefinite (0) or onetime (1)")]
    InvalidFeedType(String),

    /// A feed size was not one of the known codes or names.
    #[error("Invalid feed size '{0}': expected 1-5 or xsmall/small/average/large/xlarge")]
    InvalidFeedSize(String),
}

/// Result type alias using feeder-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
