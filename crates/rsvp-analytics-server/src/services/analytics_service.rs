//! Analytics service business logic
//!
//! Fetches raw aggregates from the data source and runs the three builders
//! independently against one reference instant chosen by the caller.

use std::sync::Arc;

use rsvp_analytics::{
    AnalyticsSnapshot, FunnelCounts, FunnelData, InviteStats, RsvpStats, VelocityData,
    build_analytics_snapshot, build_extended_funnel_data, build_funnel_data,
    build_velocity_data, parse_instant, parse_timestamps,
};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{ComputeRequest, ComputedAnalytics, EventAnalytics},
    source::{EngagementCounts, EventDataSource},
};

/// Service for analytics-related business logic
#[derive(Clone)]
pub struct AnalyticsService {
    source: Arc<dyn EventDataSource>,
}

impl AnalyticsService {
    pub fn new(source: Arc<dyn EventDataSource>) -> Self {
        Self { source }
    }

    pub async fn snapshot(&self, event_id: Uuid, now: OffsetDateTime) -> Result<AnalyticsSnapshot> {
        let (event, rsvp_stats, invite_stats) = tokio::try_join!(
            self.source.event(event_id),
            self.source.rsvp_stats(event_id),
            self.source.invite_stats(event_id),
        )?;
        Ok(build_analytics_snapshot(
            &rsvp_stats,
            &invite_stats,
            event.starts_at,
            now,
        ))
    }

    pub async fn funnel(&self, event_id: Uuid, extended: bool) -> Result<FunnelData> {
        let (rsvp_stats, invite_stats, engagement) = tokio::try_join!(
            self.source.rsvp_stats(event_id),
            self.source.invite_stats(event_id),
            self.source.engagement_counts(event_id),
        )?;
        let engagement = extended.then_some(engagement);
        Ok(funnel_for(&rsvp_stats, &invite_stats, engagement.as_ref()))
    }

    pub async fn velocity(
        &self,
        event_id: Uuid,
        now: OffsetDateTime,
        lookback_days: u32,
    ) -> Result<VelocityData> {
        // Surface unknown events as not found rather than an empty series
        let (_, timestamps) = tokio::try_join!(
            self.source.event(event_id),
            self.source.rsvp_timestamps(event_id),
        )?;
        Ok(build_velocity_data(&timestamps, now, lookback_days)?)
    }

    /// All dashboard figures for one event
    pub async fn event_analytics(
        &self,
        event_id: Uuid,
        now: OffsetDateTime,
        lookback_days: u32,
        extended: bool,
    ) -> Result<EventAnalytics> {
        let (event, rsvp_stats, invite_stats, engagement, timestamps) = tokio::try_join!(
            self.source.event(event_id),
            self.source.rsvp_stats(event_id),
            self.source.invite_stats(event_id),
            self.source.engagement_counts(event_id),
            self.source.rsvp_timestamps(event_id),
        )?;
        debug!(
            "Computing analytics for event {} over {} RSVP(s)",
            event_id,
            timestamps.len()
        );

        let snapshot = build_analytics_snapshot(&rsvp_stats, &invite_stats, event.starts_at, now);
        let engagement = extended.then_some(engagement);
        let funnel = funnel_for(&rsvp_stats, &invite_stats, engagement.as_ref());
        let velocity = build_velocity_data(&timestamps, now, lookback_days)?;

        Ok(EventAnalytics {
            event_id,
            event_name: event.name,
            snapshot,
            funnel,
            velocity,
        })
    }
}

/// Run the builders over a caller-supplied payload.
///
/// Every instant is parsed up front, so a malformed timestamp rejects the
/// request before anything is computed.
pub fn compute(
    request: &ComputeRequest,
    now: OffsetDateTime,
    lookback_days: u32,
) -> Result<ComputedAnalytics> {
    let event_date = parse_instant(&request.event_date)?;
    let timestamps = parse_timestamps(&request.rsvp_timestamps)?;

    Ok(ComputedAnalytics {
        snapshot: build_analytics_snapshot(
            &request.rsvp_stats,
            &request.invite_stats,
            event_date,
            now,
        ),
        funnel: funnel_for(
            &request.rsvp_stats,
            &request.invite_stats,
            request.engagement.as_ref(),
        ),
        velocity: build_velocity_data(&timestamps, now, lookback_days)?,
    })
}

/// Standard funnel, or the extended one when page engagement is supplied
fn funnel_for(
    rsvp_stats: &RsvpStats,
    invite_stats: &InviteStats,
    engagement: Option<&EngagementCounts>,
) -> FunnelData {
    let responded = rsvp_stats.total_responses();
    match engagement {
        None => build_funnel_data(invite_stats.total, invite_stats.opened, responded),
        Some(engagement) => build_extended_funnel_data(&FunnelCounts {
            invited: invite_stats.total,
            opened: invite_stats.opened,
            page_viewed: engagement.page_views,
            form_started: engagement.form_starts,
            responded,
        }),
    }
}
