use rsvp_analytics::{
    AnalyticsError, DEFAULT_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS, Trend, build_daily_counts,
    build_velocity_data, calculate_momentum, determine_trend,
};
use time::OffsetDateTime;
use time::macros::{date, datetime};

const REFERENCE: OffsetDateTime = datetime!(2025-03-15 12:00 UTC);

fn momentum_fixture() -> Vec<OffsetDateTime> {
    vec![
        datetime!(2025-03-16 08:00 UTC),    // after the reference, in neither window
        datetime!(2025-03-08 12:00 UTC),    // previous window, closed end
        datetime!(2025-03-15 12:00 UTC),    // current window, closed end
        datetime!(2025-03-01 12:00 UTC),    // open start of previous window, excluded
        datetime!(2025-03-08 12:00:01 UTC), // current window
        datetime!(2025-03-10 09:30 UTC),    // current window
    ]
}

#[test]
fn test_trend_thresholds() {
    assert_eq!(determine_trend(11), Trend::Accelerating);
    assert_eq!(determine_trend(10), Trend::Steady);
    assert_eq!(determine_trend(0), Trend::Steady);
    assert_eq!(determine_trend(-10), Trend::Steady);
    assert_eq!(determine_trend(-11), Trend::Slowing);
}

#[test]
fn test_momentum_sentinels() {
    let both_zero = calculate_momentum(0, 0);
    assert_eq!(both_zero.percent_change, 0);
    assert_eq!(both_zero.trend, Trend::Steady);

    let from_nothing = calculate_momentum(10, 0);
    assert_eq!(from_nothing.percent_change, 100);
    assert_eq!(from_nothing.trend, Trend::Accelerating);

    let halved = calculate_momentum(5, 10);
    assert_eq!(halved.percent_change, -50);
    assert_eq!(halved.trend, Trend::Slowing);
    assert_eq!(halved.current_7_days, 5);
    assert_eq!(halved.previous_7_days, 10);
}

#[test]
fn test_momentum_stopped_activity() {
    let stopped = calculate_momentum(0, 4);
    assert_eq!(stopped.percent_change, -100);
    assert_eq!(stopped.trend, Trend::Slowing);
}

#[test]
fn test_daily_counts_zero_fill() {
    let timestamps = [
        datetime!(2025-01-01 10:00 UTC),
        datetime!(2025-01-01 18:00 UTC),
        datetime!(2025-01-03 09:00 UTC),
    ];

    let daily = build_daily_counts(
        &timestamps,
        datetime!(2025-01-01 15:00 UTC),
        datetime!(2025-01-03 00:00 UTC),
    );

    let entries: Vec<_> = daily.iter().map(|d| (d.date, d.count, d.cumulative)).collect();
    assert_eq!(
        entries,
        vec![
            (date!(2025-01-01), 2, 2),
            (date!(2025-01-02), 0, 2),
            (date!(2025-01-03), 1, 3),
        ]
    );
}

#[test]
fn test_daily_counts_bucket_by_utc_day() {
    // 21:00 at -05:00 is already the next day in UTC
    let timestamps = [datetime!(2025-01-01 21:00 -05:00)];

    let daily = build_daily_counts(
        &timestamps,
        datetime!(2025-01-01 00:00 UTC),
        datetime!(2025-01-02 00:00 UTC),
    );

    assert_eq!(daily[0].count, 0);
    assert_eq!(daily[1].count, 1);
}

#[test]
fn test_daily_counts_across_month_boundary() {
    let daily = build_daily_counts(
        &[],
        datetime!(2024-02-27 00:00 UTC),
        datetime!(2024-03-02 00:00 UTC),
    );

    let dates: Vec<_> = daily.iter().map(|d| d.date).collect();
    assert_eq!(
        dates,
        vec![
            date!(2024-02-27),
            date!(2024-02-28),
            date!(2024-02-29),
            date!(2024-03-01),
            date!(2024-03-02),
        ]
    );
    assert!(daily.iter().all(|d| d.count == 0 && d.cumulative == 0));
}

#[test]
fn test_velocity_series_length_matches_lookback() {
    let timestamps = momentum_fixture();
    for lookback in [1, 7, 14, DEFAULT_LOOKBACK_DAYS, 90, MAX_LOOKBACK_DAYS] {
        let velocity = build_velocity_data(&timestamps, REFERENCE, lookback).unwrap();
        assert_eq!(velocity.daily.len(), lookback as usize);
        assert_eq!(velocity.daily.last().map(|d| d.date), Some(date!(2025-03-15)));
    }
}

#[test]
fn test_velocity_window_and_momentum() {
    let velocity = build_velocity_data(&momentum_fixture(), REFERENCE, DEFAULT_LOOKBACK_DAYS).unwrap();

    assert_eq!(velocity.daily.first().map(|d| d.date), Some(date!(2025-02-14)));
    assert_eq!(velocity.total_rsvps, 6);
    assert_eq!(velocity.first_rsvp_date, Some(date!(2025-03-01)));
    assert_eq!(velocity.last_rsvp_date, Some(date!(2025-03-16)));

    // Everything up to and including the reference day, but not the 16th
    assert_eq!(velocity.daily.last().map(|d| d.cumulative), Some(5));
    assert!(velocity.daily.windows(2).all(|w| w[0].cumulative <= w[1].cumulative));

    assert_eq!(velocity.momentum.current_7_days, 3);
    assert_eq!(velocity.momentum.previous_7_days, 1);
    assert_eq!(velocity.momentum.percent_change, 200);
    assert_eq!(velocity.momentum.trend, Trend::Accelerating);
}

#[test]
fn test_momentum_ignores_display_window() {
    let timestamps = momentum_fixture();
    let short = build_velocity_data(&timestamps, REFERENCE, 1).unwrap();
    let long = build_velocity_data(&timestamps, REFERENCE, 120).unwrap();

    assert_eq!(short.momentum, long.momentum);
    assert_eq!(short.daily[0].cumulative, 1);
}

#[test]
fn test_velocity_input_order_does_not_matter() {
    let timestamps = momentum_fixture();
    let mut reversed = timestamps.clone();
    reversed.reverse();

    assert_eq!(
        build_velocity_data(&timestamps, REFERENCE, 30).unwrap(),
        build_velocity_data(&reversed, REFERENCE, 30).unwrap()
    );
}

#[test]
fn test_velocity_without_rsvps() {
    let velocity = build_velocity_data(&[], REFERENCE, DEFAULT_LOOKBACK_DAYS).unwrap();

    assert!(velocity.daily.is_empty());
    assert_eq!(velocity.total_rsvps, 0);
    assert_eq!(velocity.first_rsvp_date, None);
    assert_eq!(velocity.last_rsvp_date, None);
    assert_eq!(velocity.momentum.trend, Trend::Steady);
    assert_eq!(velocity.momentum.percent_change, 0);
}

#[test]
fn test_velocity_rejects_bad_lookback() {
    let timestamps = momentum_fixture();
    for lookback in [0, MAX_LOOKBACK_DAYS + 1] {
        let err = build_velocity_data(&timestamps, REFERENCE, lookback).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InvalidLookback {
                requested: lookback,
                max: MAX_LOOKBACK_DAYS,
            }
        );
    }
}

#[test]
fn test_velocity_json_contract() {
    let velocity = build_velocity_data(&momentum_fixture(), REFERENCE, 3).unwrap();
    let json = serde_json::to_value(&velocity).unwrap();

    assert_eq!(json["daily"][0]["date"], "2025-03-13");
    assert_eq!(json["daily"][2]["count"], 1);
    assert!(json["daily"][2].get("cumulative").is_some());
    assert_eq!(json["momentum"]["current7Days"], 3);
    assert_eq!(json["momentum"]["previous7Days"], 1);
    assert_eq!(json["momentum"]["trend"], "accelerating");
    assert_eq!(json["momentum"]["percentChange"], 200);
    assert_eq!(json["totalRsvps"], 6);
    assert_eq!(json["firstRsvpDate"], "2025-03-01");
    assert_eq!(json["lastRsvpDate"], "2025-03-16");

    let empty = serde_json::to_value(build_velocity_data(&[], REFERENCE, 3).unwrap()).unwrap();
    assert!(empty["firstRsvpDate"].is_null());
    assert_eq!(empty["daily"], serde_json::json!([]));
}

#[test]
fn test_velocity_is_deterministic() {
    let timestamps = momentum_fixture();
    let first = serde_json::to_string(&build_velocity_data(&timestamps, REFERENCE, 30).unwrap()).unwrap();
    let second = serde_json::to_string(&build_velocity_data(&timestamps, REFERENCE, 30).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_velocity_without_rsvps_skips_lookback_check() {
    for lookback in [0, MAX_LOOKBACK_DAYS + 1] {
        let velocity = build_velocity_data(&[], REFERENCE, lookback).unwrap();
        assert!(velocity.daily.is_empty());
        assert_eq!(velocity.total_rsvps, 0);
    }
}
