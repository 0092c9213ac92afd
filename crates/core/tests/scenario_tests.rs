//! End-to-end tracker scenarios using the default component rules.
//!
//! Each scenario feeds a short burst of readings through
//! [`collect_alerts`] with the default threshold (3) and window (5 minutes).

use chrono::{Duration, TimeZone, Utc};
use satwatch_core::alert::Severity;
use satwatch_core::component_names::{COMPONENT_BATT, COMPONENT_TSTAT};
use satwatch_core::driver::collect_alerts;
use satwatch_core::reading::Reading;
use satwatch_core::rules::RuleSet;
use satwatch_core::tracker::{TrackerConfig, ViolationTracker};
use satwatch_core::types::{SatelliteId, Timestamp};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2018, 1, 1, 23, 1, 9).unwrap() + Duration::milliseconds(521)
}

fn default_tracker() -> ViolationTracker {
    ViolationTracker::new(TrackerConfig::default(), RuleSet::with_defaults())
}

fn battery(satellite_id: SatelliteId, offset_secs: i64, raw_value: f64) -> Reading {
    Reading {
        timestamp: t0() + Duration::seconds(offset_secs),
        satellite_id,
        red_high_limit: 17.0,
        yellow_high_limit: 15.0,
        yellow_low_limit: 9.0,
        red_low_limit: 8.0,
        raw_value,
        component: COMPONENT_BATT.to_string(),
    }
}

fn thermostat(satellite_id: SatelliteId, offset_secs: i64, raw_value: f64) -> Reading {
    Reading {
        timestamp: t0() + Duration::seconds(offset_secs),
        satellite_id,
        red_high_limit: 101.0,
        yellow_high_limit: 98.0,
        yellow_low_limit: 25.0,
        red_low_limit: 20.0,
        raw_value,
        component: COMPONENT_TSTAT.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn battery_cluster_raises_single_red_low_alert() {
    let readings = vec![
        battery(1000, 0, 7.8),
        battery(1000, 62, 7.7),
        battery(1000, 242, 7.9),
        // Different satellite, single violation.
        battery(1001, 238, 7.9),
    ];

    let mut tracker = default_tracker();
    let alerts = collect_alerts(&mut tracker, &readings);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].satellite_id, 1000);
    assert_eq!(alerts[0].severity, Severity::RedLow);
    assert_eq!(alerts[0].component, "BATT");
    assert_eq!(alerts[0].timestamp, t0());
}

#[test]
fn thermostat_cluster_raises_single_red_high_alert() {
    let readings = vec![
        thermostat(1002, 0, 101.5),
        thermostat(1002, 30, 101.1),
        thermostat(1002, 60, 101.9),
    ];

    let mut tracker = default_tracker();
    let alerts = collect_alerts(&mut tracker, &readings);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].satellite_id, 1002);
    assert_eq!(alerts[0].severity, Severity::RedHigh);
    assert_eq!(alerts[0].timestamp, t0());
}

#[test]
fn readings_exactly_at_limits_are_not_violations() {
    let readings: Vec<Reading> = (0..5)
        .flat_map(|i| [battery(1000, i * 10, 8.0), thermostat(1000, i * 10, 101.0)])
        .collect();

    let mut tracker = default_tracker();
    assert!(collect_alerts(&mut tracker, &readings).is_empty());
    assert_eq!(tracker.tracked_keys(), 0);
}

#[test]
fn two_clusters_separated_by_more_than_window_alert_twice() {
    let readings = vec![
        battery(1000, 0, 7.0),
        battery(1000, 20, 7.0),
        battery(1000, 40, 7.0),
        battery(1000, 700, 7.0),
        battery(1000, 720, 7.0),
        battery(1000, 740, 7.0),
    ];

    let mut tracker = default_tracker();
    let alerts = collect_alerts(&mut tracker, &readings);

    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].timestamp, t0());
    assert_eq!(alerts[1].timestamp, t0() + Duration::seconds(700));
}

#[test]
fn mixed_components_on_one_satellite_stay_separate() {
    let readings = vec![
        battery(1000, 0, 7.0),
        thermostat(1000, 10, 102.0),
        battery(1000, 20, 7.0),
        thermostat(1000, 30, 102.0),
    ];

    let mut tracker = default_tracker();
    assert!(collect_alerts(&mut tracker, &readings).is_empty());
    assert_eq!(tracker.pending_violations(1000, COMPONENT_BATT), 2);
    assert_eq!(tracker.pending_violations(1000, COMPONENT_TSTAT), 2);
}

#[test]
fn unknown_components_are_skipped() {
    let mut readings = vec![battery(1000, 0, 7.0), battery(1000, 10, 7.0)];
    let mut gyro = battery(1000, 15, 0.0);
    gyro.component = "GYRO".to_string();
    readings.push(gyro);
    readings.push(battery(1000, 20, 7.0));

    let mut tracker = default_tracker();
    let alerts = collect_alerts(&mut tracker, &readings);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].component, "BATT");
}

#[test]
fn custom_threshold_and_window() {
    let config = TrackerConfig::new(2, Duration::seconds(30)).unwrap();
    let mut tracker = ViolationTracker::new(config, RuleSet::with_defaults());

    let readings = vec![
        thermostat(7, 0, 150.0),
        // 31s later: first entry ages out.
        thermostat(7, 31, 150.0),
        thermostat(7, 40, 150.0),
    ];
    let alerts = collect_alerts(&mut tracker, &readings);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].timestamp, t0() + Duration::seconds(31));
}
