use rsvp_analytics::{
    InviteStats, ResponseBucket, RsvpStats, build_analytics_snapshot, calculate_open_rate,
    calculate_response_rate,
};
use time::macros::datetime;

fn sample_stats() -> RsvpStats {
    RsvpStats {
        yes: ResponseBucket { count: 10, guests: 18 },
        maybe: ResponseBucket { count: 4, guests: 4 },
        no: ResponseBucket { count: 6, guests: 6 },
    }
}

#[test]
fn test_rates_with_no_invites_are_zero() {
    for x in [0, 1, 7, 1_000, u64::MAX] {
        assert_eq!(calculate_response_rate(x, 0), 0);
        assert_eq!(calculate_open_rate(x, 0), 0);
    }
}

#[test]
fn test_full_response_is_one_hundred_percent() {
    for n in [1, 2, 3, 99, 12_345] {
        assert_eq!(calculate_response_rate(n, n), 100);
        assert_eq!(calculate_open_rate(n, n), 100);
    }
}

#[test]
fn test_rates_stay_within_bounds_on_inconsistent_counts() {
    assert_eq!(calculate_response_rate(50, 40), 100);
    assert_eq!(calculate_open_rate(41, 40), 100);
}

#[test]
fn test_build_snapshot() {
    let invites = InviteStats { total: 40, opened: 30 };
    let event = datetime!(2025-07-01 18:00 UTC);
    let now = datetime!(2025-06-20 09:00 UTC);

    let snapshot = build_analytics_snapshot(&sample_stats(), &invites, event, now);

    assert_eq!(snapshot.total_yes, 10);
    assert_eq!(snapshot.total_maybe, 4);
    assert_eq!(snapshot.total_no, 6);
    assert_eq!(snapshot.total_responses, 20);
    assert_eq!(snapshot.total_invites, 40);
    assert_eq!(snapshot.invites_opened, 30);
    assert_eq!(snapshot.response_rate, 50);
    assert_eq!(snapshot.open_rate, 75);
    assert_eq!(snapshot.expected_attendance, 18);
    // 11 days and 9 hours rounds up
    assert_eq!(snapshot.days_until_event, Some(12));
    assert_eq!(snapshot.event_date, event);
    assert_eq!(snapshot.last_updated, now);
}

#[test]
fn test_snapshot_after_event_has_no_countdown() {
    let event = datetime!(2025-07-01 18:00 UTC);
    let now = datetime!(2025-07-01 18:00 UTC);

    let snapshot = build_analytics_snapshot(&sample_stats(), &InviteStats::default(), event, now);

    assert_eq!(snapshot.days_until_event, None);
    assert_eq!(snapshot.response_rate, 0);
    assert_eq!(snapshot.open_rate, 0);
}

#[test]
fn test_snapshot_json_contract() {
    let invites = InviteStats { total: 40, opened: 30 };
    let event = datetime!(2025-07-01 18:00 UTC);
    let now = datetime!(2025-07-02 00:00 UTC);

    let snapshot = build_analytics_snapshot(&sample_stats(), &invites, event, now);
    let json = serde_json::to_value(&snapshot).unwrap();

    for key in [
        "totalYes",
        "totalMaybe",
        "totalNo",
        "totalResponses",
        "totalInvites",
        "invitesOpened",
        "responseRate",
        "openRate",
        "expectedAttendance",
        "daysUntilEvent",
        "eventDate",
        "lastUpdated",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert!(json["daysUntilEvent"].is_null());
    assert_eq!(json["eventDate"], "2025-07-01T18:00:00Z");
    assert_eq!(json["lastUpdated"], "2025-07-02T00:00:00Z");
}

#[test]
fn test_snapshot_is_deterministic() {
    let invites = InviteStats { total: 40, opened: 30 };
    let event = datetime!(2025-07-01 18:00 UTC);
    let now = datetime!(2025-06-20 09:00 UTC);

    let first = build_analytics_snapshot(&sample_stats(), &invites, event, now);
    let second = build_analytics_snapshot(&sample_stats(), &invites, event, now);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_snapshot_with_huge_counts_saturates() {
    let stats = RsvpStats {
        yes: ResponseBucket { count: u64::MAX / 2 + 1, guests: u64::MAX },
        maybe: ResponseBucket { count: u64::MAX / 2 + 1, guests: u64::MAX / 2 + 1 },
        no: ResponseBucket { count: 5, guests: 5 },
    };
    let invites = InviteStats { total: 1_000, opened: 900 };
    let event = datetime!(2025-07-01 18:00 UTC);
    let now = datetime!(2025-06-20 09:00 UTC);

    let snapshot = build_analytics_snapshot(&stats, &invites, event, now);

    assert_eq!(snapshot.total_responses, u64::MAX);
    assert_eq!(snapshot.response_rate, 100);
    assert_eq!(snapshot.expected_attendance, u64::MAX);
}
