//! Point-in-time engagement snapshot for a single event

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::rate::share_percent;

const NANOS_PER_DAY: i128 = 86_400 * 1_000_000_000;

/// Responses and party sizes for one RSVP answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBucket {
    pub count: u64,
    /// Sum of party sizes, always `>= count`
    pub guests: u64,
}

/// RSVP totals grouped by answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpStats {
    pub yes: ResponseBucket,
    pub maybe: ResponseBucket,
    pub no: ResponseBucket,
}

impl RsvpStats {
    /// Total number of RSVPs across all answers, saturating at `u64::MAX`
    pub fn total_responses(&self) -> u64 {
        self.yes
            .count
            .saturating_add(self.maybe.count)
            .saturating_add(self.no.count)
    }
}

/// Invitation delivery totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteStats {
    pub total: u64,
    /// Expected `<= total`, not enforced
    pub opened: u64,
}

/// Aggregated engagement figures at a reference instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_yes: u64,
    pub total_maybe: u64,
    pub total_no: u64,
    pub total_responses: u64,
    pub total_invites: u64,
    pub invites_opened: u64,
    pub response_rate: u32,
    pub open_rate: u32,
    pub expected_attendance: u64,
    pub days_until_event: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub event_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

/// Percentage of invites that received any response
pub fn calculate_response_rate(total_responses: u64, total_invites: u64) -> u32 {
    share_percent(total_responses, total_invites)
}

/// Percentage of invites that were opened
pub fn calculate_open_rate(invites_opened: u64, total_invites: u64) -> u32 {
    share_percent(invites_opened, total_invites)
}

/// Whole days until the event starts, rounded up.
///
/// Returns `None` once the event start is not strictly after `now`, so the
/// smallest value ever returned is 1.
pub fn calculate_days_until_event(event_date: OffsetDateTime, now: OffsetDateTime) -> Option<i64> {
    if event_date <= now {
        return None;
    }
    let nanos = (event_date - now).whole_nanoseconds();
    let days = (nanos + NANOS_PER_DAY - 1) / NANOS_PER_DAY;
    Some(days as i64)
}

/// Build the snapshot from aggregated counts. Never fails.
pub fn build_analytics_snapshot(
    rsvp_stats: &RsvpStats,
    invite_stats: &InviteStats,
    event_date: OffsetDateTime,
    now: OffsetDateTime,
) -> AnalyticsSnapshot {
    let total_responses = rsvp_stats.total_responses();

    AnalyticsSnapshot {
        total_yes: rsvp_stats.yes.count,
        total_maybe: rsvp_stats.maybe.count,
        total_no: rsvp_stats.no.count,
        total_responses,
        total_invites: invite_stats.total,
        invites_opened: invite_stats.opened,
        response_rate: calculate_response_rate(total_responses, invite_stats.total),
        open_rate: calculate_open_rate(invite_stats.opened, invite_stats.total),
        expected_attendance: rsvp_stats.yes.guests,
        days_until_event: calculate_days_until_event(event_date, now),
        event_date,
        last_updated: now,
    }
}
