//! Analytics and dashboard routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use rsvp_analytics::{AnalyticsSnapshot, FunnelData, VelocityData, parse_instant};
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{AnalyticsQuery, ApiResponse, ComputeRequest, ComputedAnalytics, EventAnalytics},
    services::analytics_service,
};

/// Per-event analytics routes
pub fn event_router() -> Router<AppState> {
    Router::new()
        .route("/{event_id}/analytics", get(get_event_analytics))
        .route("/{event_id}/snapshot", get(get_snapshot))
        .route("/{event_id}/funnel", get(get_funnel))
        .route("/{event_id}/velocity", get(get_velocity))
}

/// Stateless computation routes
pub fn compute_router() -> Router<AppState> {
    Router::new().route("/compute", post(compute_analytics))
}

/// Reference instant for a request. The wall clock is read here and only here.
///
/// A positive offset must arrive as `%2B`; a bare `+` decodes to a space.
fn resolve_now(raw: Option<&str>) -> Result<OffsetDateTime> {
    match raw {
        Some(raw) => Ok(parse_instant(raw)?),
        None => Ok(OffsetDateTime::now_utc()),
    }
}

fn parse_event_id(raw: &str) -> Result<Uuid> {
    raw.parse()
        .map_err(|_| ApiError::validation(&format!("Invalid event id: {}", raw)))
}

/// Get every dashboard figure for an event
async fn get_event_analytics(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<EventAnalytics>>> {
    debug!("Getting analytics for event {} with query: {:?}", event_id, query);

    let event_id = parse_event_id(&event_id)?;
    let now = resolve_now(query.now.as_deref())?;
    let lookback_days = state.config.lookback_days(query.lookback_days)?;

    let analytics = state
        .analytics
        .event_analytics(event_id, now, lookback_days, query.extended)
        .await?;

    if analytics.velocity.total_rsvps == 0 {
        return Ok(Json(ApiResponse::with_message(
            analytics,
            "No RSVPs recorded yet".to_string(),
        )));
    }
    Ok(Json(ApiResponse::new(analytics)))
}

/// Get the point-in-time snapshot for an event
async fn get_snapshot(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<AnalyticsSnapshot>>> {
    let event_id = parse_event_id(&event_id)?;
    let now = resolve_now(query.now.as_deref())?;

    let snapshot = state.analytics.snapshot(event_id, now).await?;
    Ok(Json(ApiResponse::new(snapshot)))
}

/// Get the conversion funnel for an event
async fn get_funnel(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<FunnelData>>> {
    let event_id = parse_event_id(&event_id)?;

    let funnel = state.analytics.funnel(event_id, query.extended).await?;
    Ok(Json(ApiResponse::new(funnel)))
}

/// Get the RSVP velocity series for an event
async fn get_velocity(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<VelocityData>>> {
    let event_id = parse_event_id(&event_id)?;
    let now = resolve_now(query.now.as_deref())?;
    let lookback_days = state.config.lookback_days(query.lookback_days)?;

    let velocity = state
        .analytics
        .velocity(event_id, now, lookback_days)
        .await?;
    Ok(Json(ApiResponse::new(velocity)))
}

/// Compute analytics from raw data supplied in the request body
async fn compute_analytics(
    State(state): State<AppState>,
    Json(request): Json<ComputeRequest>,
) -> Result<Json<ApiResponse<ComputedAnalytics>>> {
    info!(
        "Computing analytics for {} supplied RSVP timestamp(s)",
        request.rsvp_timestamps.len()
    );

    let now = resolve_now(request.now.as_deref())?;
    let lookback_days = state.config.lookback_days(request.lookback_days)?;

    let result = analytics_service::compute(&request, now, lookback_days).map_err(|e| {
        warn!("Rejected analytics computation: {}", e);
        e
    })?;
    Ok(Json(ApiResponse::new(result)))
}
