//! Boundary parsing of RSVP instants and calendar-day helpers
//!
//! Everything inside the engine works on `OffsetDateTime`. Raw strings coming
//! from a caller are parsed here, and a single malformed entry rejects the
//! whole batch: silently dropping it would corrupt the cumulative counts.

use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::error::{AnalyticsError, Result};

// `YYYY-MM-DD` (de)serialization for calendar days, with an `option` submodule
time::serde::format_description!(pub calendar_day, Date, "[year]-[month]-[day]");

/// Parse a single RFC 3339 instant
pub fn parse_instant(raw: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339).map_err(|e| AnalyticsError::InvalidTimestamp {
        index: 0,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a batch of RFC 3339 instants, failing on the first malformed entry
pub fn parse_timestamps<S: AsRef<str>>(raw: &[S]) -> Result<Vec<OffsetDateTime>> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            parse_instant(value.as_ref()).map_err(|err| match err {
                AnalyticsError::InvalidTimestamp { value, reason, .. } => {
                    AnalyticsError::InvalidTimestamp {
                        index,
                        value,
                        reason,
                    }
                }
                other => other,
            })
        })
        .collect()
}

/// UTC calendar day an instant falls on, discarding time of day
pub fn day_key(instant: OffsetDateTime) -> Date {
    instant.to_offset(UtcOffset::UTC).date()
}
