//! RSVP velocity: a zero-filled daily series plus week-over-week momentum
//!
//! Timestamps arrive unordered and sparse. They are bucketed by UTC calendar
//! day and walked in date order, so each day's cumulative total builds on the
//! previous day's. Momentum compares the trailing seven days with the seven
//! before them, independently of how many days the series displays.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, trace};

use crate::error::{AnalyticsError, Result};
use crate::rate::change_percent;
use crate::timestamp::{calendar_day, day_key};

/// Days shown by default in the daily series
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Largest lookback window accepted by [`build_velocity_data`]
pub const MAX_LOOKBACK_DAYS: u32 = 731;

/// Length of each momentum window
pub const MOMENTUM_WINDOW_DAYS: i64 = 7;

/// Percent change beyond which momentum is no longer steady
const TREND_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Accelerating,
    Steady,
    Slowing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    #[serde(with = "calendar_day")]
    pub date: Date,
    pub count: u64,
    pub cumulative: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumData {
    #[serde(rename = "current7Days")]
    pub current_7_days: u64,
    #[serde(rename = "previous7Days")]
    pub previous_7_days: u64,
    pub trend: Trend,
    pub percent_change: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityData {
    pub daily: Vec<DailyCount>,
    pub momentum: MomentumData,
    pub total_rsvps: u64,
    #[serde(with = "calendar_day::option")]
    pub first_rsvp_date: Option<Date>,
    #[serde(with = "calendar_day::option")]
    pub last_rsvp_date: Option<Date>,
}

impl VelocityData {
    /// Well-formed result for an event without any RSVPs
    pub fn empty() -> Self {
        Self {
            daily: Vec::new(),
            momentum: calculate_momentum(0, 0),
            total_rsvps: 0,
            first_rsvp_date: None,
            last_rsvp_date: None,
        }
    }
}

/// Classify a percent change. Exactly +/-10 is still steady.
pub fn determine_trend(percent_change: i64) -> Trend {
    if percent_change > TREND_THRESHOLD {
        Trend::Accelerating
    } else if percent_change < -TREND_THRESHOLD {
        Trend::Slowing
    } else {
        Trend::Steady
    }
}

/// Compare the current window with the previous one.
///
/// With no previous activity the ratio is undefined: any current activity
/// reports the 100% sentinel, and no activity at all reports 0.
pub fn calculate_momentum(current_7_days: u64, previous_7_days: u64) -> MomentumData {
    let percent_change = match change_percent(current_7_days, previous_7_days) {
        Some(change) => change,
        None if current_7_days > 0 => 100,
        None => 0,
    };

    MomentumData {
        current_7_days,
        previous_7_days,
        trend: determine_trend(percent_change),
        percent_change,
    }
}

/// One entry per UTC calendar day from `start_date` to `end_date` inclusive.
///
/// Both bounds are normalized to whole days, so any instant on the first and
/// last day counts. Timestamps outside the range are ignored, and
/// `cumulative` starts from zero at `start_date`.
pub fn build_daily_counts(
    timestamps: &[OffsetDateTime],
    start_date: OffsetDateTime,
    end_date: OffsetDateTime,
) -> Vec<DailyCount> {
    daily_counts_between(timestamps, day_key(start_date), day_key(end_date))
}

fn daily_counts_between(timestamps: &[OffsetDateTime], first: Date, last: Date) -> Vec<DailyCount> {
    if first > last {
        return Vec::new();
    }

    let mut per_day: BTreeMap<Date, u64> = BTreeMap::new();
    for &ts in timestamps {
        *per_day.entry(day_key(ts)).or_insert(0) += 1;
    }

    let capacity = (last - first).whole_days() as usize + 1;
    let mut daily = Vec::with_capacity(capacity);
    let mut cumulative = 0u64;
    let mut day = first;
    loop {
        let count = per_day.get(&day).copied().unwrap_or(0);
        cumulative += count;
        daily.push(DailyCount {
            date: day,
            count,
            cumulative,
        });

        if day == last {
            break;
        }
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }

    trace!(
        days = daily.len(),
        in_window = cumulative,
        outside_window = timestamps.len() as u64 - cumulative,
        "bucketed RSVP timestamps"
    );

    daily
}

/// Build the daily series and momentum relative to `reference`.
///
/// The series covers `lookback_days` calendar days ending on the reference
/// day. With no timestamps at all the result is [`VelocityData::empty`],
/// returned before the lookback is looked at.
pub fn build_velocity_data(
    timestamps: &[OffsetDateTime],
    reference: OffsetDateTime,
    lookback_days: u32,
) -> Result<VelocityData> {
    if timestamps.is_empty() {
        return Ok(VelocityData::empty());
    }

    if lookback_days == 0 || lookback_days > MAX_LOOKBACK_DAYS {
        return Err(AnalyticsError::InvalidLookback {
            requested: lookback_days,
            max: MAX_LOOKBACK_DAYS,
        });
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    let end_day = day_key(reference);
    let start_day = end_day
        .checked_sub(Duration::days(i64::from(lookback_days) - 1))
        .ok_or(AnalyticsError::DateOutOfRange {
            context: "lookback window",
        })?;
    let daily = daily_counts_between(&sorted, start_day, end_day);

    let current_start = reference
        .checked_sub(Duration::days(MOMENTUM_WINDOW_DAYS))
        .ok_or(AnalyticsError::DateOutOfRange {
            context: "current momentum window",
        })?;
    let previous_start = current_start
        .checked_sub(Duration::days(MOMENTUM_WINDOW_DAYS))
        .ok_or(AnalyticsError::DateOutOfRange {
            context: "previous momentum window",
        })?;

    let current = count_in(&sorted, current_start, reference);
    let previous = count_in(&sorted, previous_start, current_start);
    let momentum = calculate_momentum(current, previous);

    debug!(
        total = sorted.len(),
        lookback_days,
        current_7_days = current,
        previous_7_days = previous,
        trend = ?momentum.trend,
        "computed RSVP velocity"
    );

    Ok(VelocityData {
        daily,
        momentum,
        total_rsvps: sorted.len() as u64,
        first_rsvp_date: sorted.first().copied().map(day_key),
        last_rsvp_date: sorted.last().copied().map(day_key),
    })
}

/// Number of sorted timestamps in the half-open interval `(after, until]`
fn count_in(sorted: &[OffsetDateTime], after: OffsetDateTime, until: OffsetDateTime) -> u64 {
    let lo = sorted.partition_point(|ts| *ts <= after);
    let hi = sorted.partition_point(|ts| *ts <= until);
    hi.saturating_sub(lo) as u64
}
