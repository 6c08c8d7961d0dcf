//! Analytics and dashboard API models

use rsvp_analytics::{AnalyticsSnapshot, FunnelData, InviteStats, RsvpStats, VelocityData};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::source::EngagementCounts;

/// Query parameters shared by the per-event analytics routes
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    /// Days shown in the velocity series
    pub lookback_days: Option<u32>,

    /// Reference instant (RFC 3339). Defaults to the time of the request.
    pub now: Option<String>,

    /// Use the five-stage funnel
    #[serde(default)]
    pub extended: bool,
}

/// Everything the event dashboard renders, computed at one reference instant
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnalytics {
    pub event_id: Uuid,
    pub event_name: String,
    pub snapshot: AnalyticsSnapshot,
    pub funnel: FunnelData,
    pub velocity: VelocityData,
}

/// Stateless computation over caller-supplied raw data
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequest {
    #[serde(default)]
    pub rsvp_stats: RsvpStats,

    #[serde(default)]
    pub invite_stats: InviteStats,

    /// RFC 3339 instants; one malformed entry rejects the request
    #[serde(default)]
    pub rsvp_timestamps: Vec<String>,

    pub event_date: String,

    pub now: Option<String>,

    pub lookback_days: Option<u32>,

    /// Present to request the five-stage funnel
    pub engagement: Option<EngagementCounts>,
}

/// Result of a stateless computation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedAnalytics {
    pub snapshot: AnalyticsSnapshot,
    pub funnel: FunnelData,
    pub velocity: VelocityData,
}
