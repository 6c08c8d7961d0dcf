//! Engagement analytics for event invitations.
//!
//! Three independent, pure builders turn raw invite and RSVP data into
//! dashboard figures:
//!
//! - [`build_analytics_snapshot`] aggregates totals, rates and expected attendance
//! - [`build_funnel_data`] / [`build_extended_funnel_data`] compute stage
//!   percentages and pairwise dropoff
//! - [`build_velocity_data`] buckets RSVP timestamps into a daily series and
//!   classifies week-over-week momentum
//!
//! No builder reads the system clock. The reference instant is always passed
//! in, so identical inputs always produce identical output.
//!
//! ```
//! use rsvp_analytics::build_funnel_data;
//!
//! let funnel = build_funnel_data(100, 80, 60);
//! assert_eq!(funnel.overall_conversion_rate, 60);
//! assert_eq!(funnel.dropoffs[1].rate, 25);
//! ```

pub mod error;
pub mod funnel;
pub mod rate;
pub mod snapshot;
pub mod timestamp;
pub mod velocity;

// Re-export core types
pub use error::{AnalyticsError, Result};
pub use funnel::{
    EXTENDED_STAGES, FunnelCounts, FunnelData, FunnelDropoff, FunnelStage, FunnelStageName,
    STANDARD_STAGES, build_extended_funnel_data, build_funnel, build_funnel_data,
    calculate_dropoff,
};
pub use snapshot::{
    AnalyticsSnapshot, InviteStats, ResponseBucket, RsvpStats, build_analytics_snapshot,
    calculate_days_until_event, calculate_open_rate, calculate_response_rate,
};
pub use timestamp::{day_key, parse_instant, parse_timestamps};
pub use velocity::{
    DEFAULT_LOOKBACK_DAYS, DailyCount, MAX_LOOKBACK_DAYS, MomentumData, Trend, VelocityData,
    build_daily_counts, build_velocity_data, calculate_momentum, determine_trend,
};

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
