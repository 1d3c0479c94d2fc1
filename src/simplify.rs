//! Ramer-Douglas-Peucker path simplification.
//!
//! Distances are planar in raw degree space, so `epsilon` is in degrees and
//! should stay well below the grid size.

use crate::GpsPoint;

/// Perpendicular distance from `point` to the infinite line through `a` and `b`.
///
/// Falls back to the plain point distance when `a` and `b` coincide.
pub fn perpendicular_distance(point: &GpsPoint, a: &GpsPoint, b: &GpsPoint) -> f64 {
    let dx = b.longitude - a.longitude;
    let dy = b.latitude - a.latitude;
    let chord = dx.hypot(dy);

    if chord == 0.0 {
        return (point.longitude - a.longitude).hypot(point.latitude - a.latitude);
    }

    let cross = dx * (point.latitude - a.latitude) - dy * (point.longitude - a.longitude);
    cross.abs() / chord
}

/// Simplify a path, keeping only points that deviate more than `epsilon`
/// from the chord of their enclosing span.
///
/// Paths of two points or fewer are returned unchanged. The first and last
/// points are always kept.
pub fn simplify(points: &[GpsPoint], epsilon: f64) -> Vec<GpsPoint> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    simplify_indices(points, epsilon)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Indices of the points kept by [`simplify`], in ascending order.
pub fn simplify_indices(points: &[GpsPoint], epsilon: f64) -> Vec<usize> {
    let n = points.len();
    if n <= 2 {
        return (0..n).collect();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    // Spans still to examine, as (start, end) inclusive.
    let mut stack = vec![(0, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let (first, last) = (&points[start], &points[end]);
        let mut max_distance = 0.0;
        let mut max_index = start;
        for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = perpendicular_distance(p, first, last);
            if d > max_distance {
                max_distance = d;
                max_index = i;
            }
        }

        if max_distance > epsilon {
            keep[max_index] = true;
            stack.push((start, max_index));
            stack.push((max_index, end));
        }
    }

    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect()
}
