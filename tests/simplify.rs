//! Tests for Douglas-Peucker simplification

mod common;

use common::approx_eq;
use proptest::prelude::*;
use turfwalk::simplify::{perpendicular_distance, simplify, simplify_indices};
use turfwalk::GpsPoint;

fn line(n: usize) -> Vec<GpsPoint> {
    (0..n)
        .map(|i| GpsPoint::new(51.5 + i as f64 * 0.0001, -0.12))
        .collect()
}

#[test]
fn test_short_paths_unchanged() {
    assert!(simplify(&[], 0.0).is_empty());
    let one = line(1);
    assert_eq!(simplify(&one, 0.0), one);
    let two = line(2);
    assert_eq!(simplify(&two, 1.0), two);
}

#[test]
fn test_straight_line_collapses_at_zero_epsilon() {
    let three = vec![
        GpsPoint::new(0.0, 0.0),
        GpsPoint::new(0.0, 0.0001),
        GpsPoint::new(0.0, 0.0002),
    ];
    let simplified = simplify(&three, 0.0);
    assert_eq!(simplified, vec![three[0], three[2]]);
}

#[test]
fn test_infinite_epsilon_keeps_only_endpoints() {
    let zigzag: Vec<GpsPoint> = (0..20)
        .map(|i| GpsPoint::new(i as f64 * 0.0001, if i % 2 == 0 { 0.0 } else { 0.0005 }))
        .collect();
    let simplified = simplify(&zigzag, f64::INFINITY);
    assert_eq!(simplified.len(), 2);
    assert_eq!(simplified[0], zigzag[0]);
    assert_eq!(simplified[1], zigzag[19]);
}

#[test]
fn test_zigzag_retains_peaks() {
    let zigzag: Vec<GpsPoint> = (0..7)
        .map(|i| GpsPoint::new(i as f64 * 0.0001, if i % 2 == 0 { 0.0 } else { 0.0005 }))
        .collect();
    assert_eq!(simplify(&zigzag, 0.00001).len(), 7);
}

#[test]
fn test_small_wobble_removed() {
    let mut points = line(10);
    points[4].longitude += 0.000001;
    let simplified = simplify(&points, 0.00001);
    assert_eq!(simplified.len(), 2);
}

#[test]
fn test_closed_ring_keeps_corners() {
    // Degenerate chord (first == last) falls back to point distance
    let ring = vec![
        GpsPoint::new(0.0, 0.0),
        GpsPoint::new(0.0005, 0.0),
        GpsPoint::new(0.0005, 0.0005),
        GpsPoint::new(0.0, 0.0005),
        GpsPoint::new(0.0, 0.0),
    ];
    assert_eq!(simplify(&ring, 0.00001), ring);
    assert_eq!(simplify_indices(&ring, 0.00001), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_perpendicular_distance() {
    let a = GpsPoint::new(0.0, 0.0);
    let b = GpsPoint::new(0.0, 1.0);
    let p = GpsPoint::new(0.5, 0.3);
    assert!(approx_eq(perpendicular_distance(&p, &a, &b), 0.5, 1e-12));

    // Beyond the chord end, distance is still to the infinite line
    let q = GpsPoint::new(-0.25, 3.0);
    assert!(approx_eq(perpendicular_distance(&q, &a, &b), 0.25, 1e-12));
}

#[test]
fn test_perpendicular_distance_degenerate_chord() {
    let a = GpsPoint::new(1.0, 1.0);
    let p = GpsPoint::new(4.0, 5.0);
    assert!(approx_eq(perpendicular_distance(&p, &a, &a), 5.0, 1e-12));
}

fn arb_path() -> impl Strategy<Value = Vec<GpsPoint>> {
    prop::collection::vec((51.49f64..51.51, -0.13f64..-0.11), 0..60)
        .prop_map(|v| v.into_iter().map(|(lat, lng)| GpsPoint::new(lat, lng)).collect())
}

proptest! {
    #[test]
    fn prop_never_grows_and_keeps_endpoints(path in arb_path(), epsilon in 0.0f64..0.001) {
        let simplified = simplify(&path, epsilon);
        prop_assert!(simplified.len() <= path.len());
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            prop_assert_eq!(simplified.first(), Some(first));
            prop_assert_eq!(simplified.last(), Some(last));
        }
    }

    #[test]
    fn prop_output_is_a_subsequence(path in arb_path(), epsilon in 0.0f64..0.001) {
        let indices = simplify_indices(&path, epsilon);
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(indices.iter().all(|&i| i < path.len()));
    }
}
