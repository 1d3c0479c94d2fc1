//! Closed polygons built from path fragments.

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

use crate::geo_utils::path_length;
use crate::{Bounds, GpsPoint};

/// A strictly closed ring of points: first and last are equal and no two
/// consecutive points are within the cleaning epsilon of each other.
///
/// Only constructible through [`Polygon::clean`], so the invariants always hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<GpsPoint>,
}

fn near(a: &GpsPoint, b: &GpsPoint, epsilon: f64) -> bool {
    (a.latitude - b.latitude).abs() < epsilon && (a.longitude - b.longitude).abs() < epsilon
}

impl Polygon {
    /// Remove consecutive near-duplicates and force strict closure.
    ///
    /// Returns `None` if fewer than three points remain (a ring needs at
    /// least two distinct vertices plus the closing point).
    pub fn clean(points: &[GpsPoint], epsilon: f64) -> Option<Self> {
        let first = *points.first()?;

        let mut cleaned: Vec<GpsPoint> = Vec::with_capacity(points.len() + 1);
        for p in points {
            match cleaned.last() {
                Some(last) if near(last, p, epsilon) => {}
                _ => cleaned.push(*p),
            }
        }

        // Close the ring on the exact first point.
        let closes = cleaned.last().is_some_and(|last| near(last, &first, epsilon));
        if !closes {
            cleaned.push(first);
        } else if let Some(last) = cleaned.last_mut() {
            *last = first;
        }

        if cleaned.len() < 3 {
            return None;
        }

        Some(Self { points: cleaned })
    }

    /// All points, closing point included.
    pub fn points(&self) -> &[GpsPoint] {
        &self.points
    }

    /// Number of points, closing point included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of great-circle edge lengths in meters.
    pub fn perimeter_meters(&self) -> f64 {
        path_length(&self.points)
    }

    pub fn bounds(&self) -> Bounds {
        // Non-empty by construction.
        Bounds::from_points(&self.points).unwrap_or(Bounds {
            min_lat: 0.0,
            max_lat: 0.0,
            min_lng: 0.0,
            max_lng: 0.0,
        })
    }

    /// Same ring walked in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Convert to a `geo` polygon with (x, y) = (lng, lat).
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let ring: LineString<f64> = self
            .points
            .iter()
            .map(|p| Coord {
                x: p.longitude,
                y: p.latitude,
            })
            .collect();
        geo::Polygon::new(ring, vec![])
    }
}
