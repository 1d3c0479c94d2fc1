//! Geographic utilities: distances, degree conversions, bounds and planar
//! segment intersection on raw (lat, lng) coordinates.

use geo::{Distance, Haversine, Point};

use crate::{Bounds, GpsPoint};

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Line-intersection denominators below this are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-18;

/// Great-circle distance between two points in meters.
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Sum of consecutive great-circle distances along a path.
pub fn path_length(points: &[GpsPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Convert a distance to degrees of longitude at the given latitude.
///
/// This is also an upper bound for the same distance in degrees of latitude,
/// which makes it a safe search radius in either axis.
pub fn meters_to_degrees(meters: f64, latitude: f64) -> f64 {
    let cos_lat = latitude.to_radians().cos().abs().max(1e-6);
    meters / (METERS_PER_DEGREE * cos_lat)
}

/// Bounding box of a track. Empty input yields an inverted (MAX/MIN) box.
pub fn compute_bounds(points: &[GpsPoint]) -> Bounds {
    Bounds::from_points(points).unwrap_or(Bounds {
        min_lat: f64::MAX,
        max_lat: f64::MIN,
        min_lng: f64::MAX,
        max_lng: f64::MIN,
    })
}

/// Arithmetic mean of a track's coordinates; origin for empty input.
pub fn compute_center(points: &[GpsPoint]) -> GpsPoint {
    if points.is_empty() {
        return GpsPoint::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.latitude).sum::<f64>() / n;
    let lng = points.iter().map(|p| p.longitude).sum::<f64>() / n;
    GpsPoint::new(lat, lng)
}

/// Proper 2D intersection of segments `a1→a2` and `b1→b2`, treating
/// (lng, lat) as planar coordinates.
///
/// Returns `None` for parallel or collinear segments (near-zero denominator)
/// and when the crossing lies outside either segment. The returned point
/// carries `a2`'s timestamp and no accuracy.
pub fn segment_intersection(
    a1: &GpsPoint,
    a2: &GpsPoint,
    b1: &GpsPoint,
    b2: &GpsPoint,
) -> Option<GpsPoint> {
    let (ax, ay) = (a1.longitude, a1.latitude);
    let (rx, ry) = (a2.longitude - ax, a2.latitude - ay);
    let (bx, by) = (b1.longitude, b1.latitude);
    let (sx, sy) = (b2.longitude - bx, b2.latitude - by);

    let denom = rx * sy - ry * sx;
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let (qx, qy) = (bx - ax, by - ay);
    let t = (qx * sy - qy * sx) / denom;
    let u = (qx * ry - qy * rx) / denom;

    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(GpsPoint {
        latitude: ay + t * ry,
        longitude: ax + t * rx,
        accuracy: None,
        timestamp: a2.timestamp,
    })
}
