//! Error types for the analytics engine
//!
//! The engine is arithmetic over caller-supplied data, so the taxonomy is
//! narrow: the only failures are inputs that cannot be interpreted at all.
//! Division by zero, empty input and inconsistent counts are never errors.

use thiserror::Error;

/// Main error type for the analytics engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// A raw timestamp could not be parsed as an RFC 3339 instant
    #[error("Invalid timestamp at index {index}: {value:?} - {reason}")]
    InvalidTimestamp {
        index: usize,
        value: String,
        reason: String,
    },

    /// The requested lookback window is empty or larger than the engine allows
    #[error("Invalid lookback window: {requested} day(s), expected 1..={max}")]
    InvalidLookback { requested: u32, max: u32 },

    /// Date arithmetic left the representable calendar range
    #[error("Date out of range while computing {context}")]
    DateOutOfRange { context: &'static str },
}

/// Shorthand result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

impl AnalyticsError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AnalyticsError::InvalidTimestamp { index, value, .. } => {
                format!(
                    "RSVP timestamp #{} ({:?}) is not a valid ISO-8601 instant",
                    index, value
                )
            }
            AnalyticsError::InvalidLookback { requested, max } => {
                format!(
                    "Lookback window of {} day(s) is not supported (maximum {})",
                    requested, max
                )
            }
            AnalyticsError::DateOutOfRange { .. } => {
                "Dates are outside the supported calendar range".to_string()
            }
        }
    }

    /// Get error suggestions for common problems
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            AnalyticsError::InvalidTimestamp { .. } => vec![
                "Send timestamps as RFC 3339 strings, e.g. 2025-01-31T18:30:00Z".to_string(),
                "Include an explicit UTC offset on every timestamp".to_string(),
            ],
            AnalyticsError::InvalidLookback { max, .. } => {
                vec![format!("Use a lookback between 1 and {} days", max)]
            }
            AnalyticsError::DateOutOfRange { .. } => vec![],
        }
    }
}
