//! Shared helpers for integration tests: build walks in local meters.

#![allow(dead_code)]

use turfwalk::GpsPoint;

pub const METERS_PER_DEG: f64 = 111_320.0;

pub const LONDON: GpsPoint = GpsPoint {
    latitude: 51.5074,
    longitude: -0.1278,
    accuracy: None,
    timestamp: 0,
};

pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Offset `origin` by (north, east) meters.
pub fn offset(origin: &GpsPoint, north_m: f64, east_m: f64) -> GpsPoint {
    GpsPoint::new(
        origin.latitude + north_m / METERS_PER_DEG,
        origin.longitude + east_m / (METERS_PER_DEG * origin.latitude.to_radians().cos()),
    )
}

/// Turn (north, east) offsets into timestamped fixes, one per second.
pub fn path_from_offsets(origin: &GpsPoint, offsets: &[(f64, f64)]) -> Vec<GpsPoint> {
    offsets
        .iter()
        .enumerate()
        .map(|(i, &(n, e))| {
            let p = offset(origin, n, e);
            GpsPoint::with_accuracy(p.latitude, p.longitude, 5.0, i as i64 * 1000)
        })
        .collect()
}

/// Sample straight legs between (north, east) vertices every `spacing` meters.
pub fn sample_legs(vertices: &[(f64, f64)], spacing: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    for w in vertices.windows(2) {
        let ((n0, e0), (n1, e1)) = (w[0], w[1]);
        let steps = ((n1 - n0).hypot(e1 - e0) / spacing).ceil().max(1.0) as usize;
        for s in 0..steps {
            let t = s as f64 / steps as f64;
            out.push((n0 + t * (n1 - n0), e0 + t * (e1 - e0)));
        }
    }
    if let Some(&last) = vertices.last() {
        out.push(last);
    }
    out
}

/// Walk a square of `side` meters: north, east, south, then west back home.
pub fn square_walk(origin: &GpsPoint, side: f64, spacing: f64) -> Vec<GpsPoint> {
    let s = side;
    path_from_offsets(
        origin,
        &sample_legs(&[(0.0, 0.0), (s, 0.0), (s, s), (0.0, s), (0.0, 0.0)], spacing),
    )
}

/// Corner ring of the same square, closed.
pub fn square_corners(origin: &GpsPoint, side: f64) -> Vec<GpsPoint> {
    let s = side;
    [(0.0, 0.0), (s, 0.0), (s, s), (0.0, s), (0.0, 0.0)]
        .iter()
        .map(|&(n, e)| offset(origin, n, e))
        .collect()
}

/// Closed ring from vertices given in grid units (row, col) on a grid of `g` degrees.
pub fn ring_in_grid_units(vertices: &[(f64, f64)], g: f64) -> Vec<GpsPoint> {
    let mut ring: Vec<GpsPoint> = vertices
        .iter()
        .map(|&(r, c)| GpsPoint::new(r * g, c * g))
        .collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}
