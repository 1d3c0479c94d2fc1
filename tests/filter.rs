//! Tests for fix filtering

mod common;

use common::approx_eq;
use turfwalk::filter::filter_fix;
use turfwalk::{FixFilter, GpsPoint, TerritoryConfig};

fn previous() -> GpsPoint {
    GpsPoint::with_accuracy(51.5000, -0.1200, 5.0, 1_000)
}

#[test]
fn test_inaccurate_fix_after_previous_is_rejected() {
    let raw = GpsPoint::with_accuracy(51.5010, -0.1210, 500.0, 2_000);
    assert!(filter_fix(&raw, Some(&previous()), false).is_none());
}

#[test]
fn test_inaccurate_fix_without_previous_is_accepted() {
    let raw = GpsPoint::with_accuracy(51.5010, -0.1210, 500.0, 2_000);
    assert_eq!(filter_fix(&raw, None, false), Some(raw));
}

#[test]
fn test_threshold_is_inclusive() {
    let raw = GpsPoint::with_accuracy(51.5010, -0.1210, 150.0, 2_000);
    assert!(filter_fix(&raw, Some(&previous()), false).is_some());
}

#[test]
fn test_missing_accuracy_is_accepted() {
    let raw = GpsPoint::new(51.5010, -0.1210).at(2_000);
    assert!(filter_fix(&raw, Some(&previous()), false).is_some());
}

#[test]
fn test_ema_smoothing() {
    let raw = GpsPoint::with_accuracy(51.5004, -0.1204, 8.0, 2_000);
    let smoothed = filter_fix(&raw, Some(&previous()), false).unwrap();

    assert!(approx_eq(smoothed.latitude, 51.5001, 1e-12));
    assert!(approx_eq(smoothed.longitude, -0.1201, 1e-12));
    // Accuracy and timestamp come from the raw fix
    assert_eq!(smoothed.accuracy, Some(8.0));
    assert_eq!(smoothed.timestamp, 2_000);
}

#[test]
fn test_test_mode_passes_everything() {
    let raw = GpsPoint::with_accuracy(51.5010, -0.1210, 500.0, 2_000);
    assert_eq!(filter_fix(&raw, Some(&previous()), true), Some(raw));
}

#[test]
fn test_filter_from_config() {
    let cfg = TerritoryConfig {
        accuracy_threshold: 20.0,
        ema_alpha: 1.0,
        ..TerritoryConfig::default()
    };
    let filter = FixFilter::from_config(&cfg);

    let noisy = GpsPoint::with_accuracy(51.5010, -0.1210, 30.0, 2_000);
    assert!(filter.filter(&noisy, Some(&previous())).is_none());

    // alpha = 1 means no smoothing at all
    let good = GpsPoint::with_accuracy(51.5010, -0.1210, 10.0, 2_000);
    assert_eq!(filter.filter(&good, Some(&previous())), Some(good));
}

#[test]
fn test_smoothing_converges_on_stationary_fix() {
    let filter = FixFilter::default();
    let target = GpsPoint::with_accuracy(51.5010, -0.1210, 5.0, 0);
    let mut current = previous();
    for i in 0..60 {
        current = filter.filter(&target.at(i), Some(&current)).unwrap();
    }
    assert!(approx_eq(current.latitude, target.latitude, 1e-9));
    assert!(approx_eq(current.longitude, target.longitude, 1e-9));
}
