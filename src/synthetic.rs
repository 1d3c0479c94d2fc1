//! Synthetic walk generator for tests and benchmarking.
//!
//! Produces timestamped GPS fixes tracing a known loop, with optional
//! approach tail, Gaussian GPS noise and injected low-accuracy outliers,
//! so captured areas can be checked against a ground truth.
//!
//! Feature-gated behind `synthetic`; not included in production builds.
//!
//! # Example
//!
//! ```rust
//! use turfwalk::synthetic::{WalkScenario, WalkShape};
//! use turfwalk::GpsPoint;
//!
//! let scenario = WalkScenario {
//!     shape: WalkShape::Square { side_m: 50.0 },
//!     ..WalkScenario::at(GpsPoint::new(51.5074, -0.1278))
//! };
//!
//! let walk = scenario.generate();
//! assert!(walk.len() > 40);
//! ```

use crate::geo_utils::METERS_PER_DEGREE;
use crate::GpsPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

// ============================================================================
// Types
// ============================================================================

/// Loop shape, measured from the scenario origin.
#[derive(Debug, Clone, Copy)]
pub enum WalkShape {
    /// Axis-aligned square: north, east, south, then back west to the origin.
    Square { side_m: f64 },
    /// Counter-clockwise circle starting at its southernmost point (the origin).
    Circle { radius_m: f64 },
}

/// A scripted walk around one loop.
#[derive(Debug, Clone)]
pub struct WalkScenario {
    /// Where the loop starts and ends.
    pub origin: GpsPoint,
    pub shape: WalkShape,
    /// Distance between consecutive fixes in meters.
    pub spacing_m: f64,
    /// Straight approach from due south before the loop starts (0 = none).
    pub approach_m: f64,
    /// Standard deviation of Gaussian position noise in meters.
    pub noise_sigma_m: f64,
    /// Reported accuracy of normal fixes in meters.
    pub accuracy_m: f64,
    /// Every n-th fix becomes a far-off low-accuracy outlier.
    pub outlier_every: Option<usize>,
    /// Time between fixes.
    pub interval_ms: i64,
    pub start_time_ms: i64,
    pub seed: u64,
}

impl WalkScenario {
    /// A noiseless 50 m square with 5 m fix spacing at `origin`.
    pub fn at(origin: GpsPoint) -> Self {
        Self {
            origin,
            shape: WalkShape::Square { side_m: 50.0 },
            spacing_m: 5.0,
            approach_m: 0.0,
            noise_sigma_m: 0.0,
            accuracy_m: 5.0,
            outlier_every: None,
            interval_ms: 2_000,
            start_time_ms: 1_700_000_000_000,
            seed: 42,
        }
    }
}

// ============================================================================
// Coordinate Helpers
// ============================================================================

/// Convert meters to degrees of latitude.
fn meters_to_deg_lat(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

/// Convert meters to degrees of longitude at a given latitude.
fn meters_to_deg_lng(meters: f64, latitude: f64) -> f64 {
    let meters_per_deg_lng = METERS_PER_DEGREE * latitude.to_radians().cos();
    if meters_per_deg_lng.abs() < 1e-10 {
        return 0.0;
    }
    meters / meters_per_deg_lng
}

/// Offset a point by (north, east) meters.
fn offset(origin: &GpsPoint, north_m: f64, east_m: f64) -> GpsPoint {
    GpsPoint::new(
        origin.latitude + meters_to_deg_lat(north_m),
        origin.longitude + meters_to_deg_lng(east_m, origin.latitude),
    )
}

/// Sample a polyline of (north, east) vertices every `spacing` meters.
/// The last vertex is always included.
fn sample_polyline(vertices: &[(f64, f64)], spacing: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    for w in vertices.windows(2) {
        let ((n0, e0), (n1, e1)) = (w[0], w[1]);
        let len = (n1 - n0).hypot(e1 - e0);
        let steps = (len / spacing).ceil().max(1.0) as usize;
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

/// Gaussian sample via Box-Muller.
fn gaussian_pair(rng: &mut StdRng) -> (f64, f64) {
    let u1: f64 = rng.gen_range(0.0001..1.0);
    let u2: f64 = rng.r#gen();
    let r = (-2.0 * u1.ln()).sqrt();
    (r * (2.0 * PI * u2).cos(), r * (2.0 * PI * u2).sin())
}

// ============================================================================
// Generation
// ============================================================================

impl WalkScenario {
    /// Noise-free (north, east) offsets of the walk, approach included.
    pub fn ground_truth_offsets(&self) -> Vec<(f64, f64)> {
        let spacing = self.spacing_m.max(0.1);
        let mut offsets = if self.approach_m > 0.0 {
            let mut tail = sample_polyline(&[(-self.approach_m, 0.0), (0.0, 0.0)], spacing);
            tail.pop();
            tail
        } else {
            Vec::new()
        };

        match self.shape {
            WalkShape::Square { side_m } => {
                let s = side_m;
                offsets.extend(sample_polyline(
                    &[(0.0, 0.0), (s, 0.0), (s, s), (0.0, s), (0.0, 0.0)],
                    spacing,
                ));
            }
            WalkShape::Circle { radius_m } => {
                let steps = ((2.0 * PI * radius_m) / spacing).ceil().max(8.0) as usize;
                offsets.extend((0..=steps).map(|i| {
                    let theta = 2.0 * PI * i as f64 / steps as f64;
                    // Starts at the southernmost point, center due north of origin.
                    (radius_m - radius_m * theta.cos(), radius_m * theta.sin())
                }));
            }
        }
        offsets
    }

    /// Generate the timestamped fixes.
    pub fn generate(&self) -> Vec<GpsPoint> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        self.ground_truth_offsets()
            .into_iter()
            .enumerate()
            .map(|(i, (north, east))| {
                let timestamp = self.start_time_ms + i as i64 * self.interval_ms;

                if self.outlier_every.is_some_and(|n| n > 0 && i > 0 && i % n == 0) {
                    let bearing: f64 = rng.gen_range(0.0..(2.0 * PI));
                    let p = offset(
                        &self.origin,
                        north + 250.0 * bearing.cos(),
                        east + 250.0 * bearing.sin(),
                    );
                    return GpsPoint::with_accuracy(p.latitude, p.longitude, 500.0, timestamp);
                }

                let (dn, de) = if self.noise_sigma_m > 0.0 {
                    let (z0, z1) = gaussian_pair(&mut rng);
                    (z0 * self.noise_sigma_m, z1 * self.noise_sigma_m)
                } else {
                    (0.0, 0.0)
                };
                let p = offset(&self.origin, north + dn, east + de);
                GpsPoint::with_accuracy(p.latitude, p.longitude, self.accuracy_m, timestamp)
            })
            .collect()
    }

    /// The loop's corner polygon (square) or sampled ring (circle), noise-free
    /// and closed.
    pub fn loop_outline(&self) -> Vec<GpsPoint> {
        match self.shape {
            WalkShape::Square { side_m: s } => [(0.0, 0.0), (s, 0.0), (s, s), (0.0, s), (0.0, 0.0)]
                .iter()
                .map(|&(n, e)| offset(&self.origin, n, e))
                .collect(),
            WalkShape::Circle { .. } => {
                let skip = self
                    .ground_truth_offsets()
                    .iter()
                    .take_while(|(n, _)| *n < 0.0)
                    .count();
                self.ground_truth_offsets()[skip..]
                    .iter()
                    .map(|&(n, e)| offset(&self.origin, n, e))
                    .collect()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: GpsPoint = GpsPoint {
        latitude: 51.5074,
        longitude: -0.1278,
        accuracy: None,
        timestamp: 0,
    };

    #[test]
    fn test_square_closes_on_origin() {
        let walk = WalkScenario::at(LONDON).generate();
        let first = walk.first().unwrap();
        let last = walk.last().unwrap();
        assert!((first.latitude - last.latitude).abs() < 1e-12);
        assert!((first.longitude - last.longitude).abs() < 1e-12);
        // 200 m at 5 m spacing plus the closing fix
        assert_eq!(walk.len(), 41);
    }

    #[test]
    fn test_deterministic_generation() {
        let scenario = WalkScenario {
            noise_sigma_m: 3.0,
            ..WalkScenario::at(LONDON)
        };
        let a = scenario.generate();
        let b = scenario.generate();
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_applied() {
        let clean = WalkScenario::at(LONDON).generate();
        let noisy = WalkScenario {
            noise_sigma_m: 3.0,
            ..WalkScenario::at(LONDON)
        }
        .generate();
        assert_eq!(clean.len(), noisy.len());
        assert!(clean.iter().zip(&noisy).any(|(a, b)| a.latitude != b.latitude));
    }

    #[test]
    fn test_outliers_have_poor_accuracy() {
        let walk = WalkScenario {
            outlier_every: Some(7),
            ..WalkScenario::at(LONDON)
        }
        .generate();
        assert_eq!(walk[7].accuracy, Some(500.0));
        assert_eq!(walk[6].accuracy, Some(5.0));
        assert_eq!(walk[0].accuracy, Some(5.0));
    }

    #[test]
    fn test_approach_precedes_loop() {
        let scenario = WalkScenario {
            approach_m: 30.0,
            ..WalkScenario::at(LONDON)
        };
        let offsets = scenario.ground_truth_offsets();
        assert_eq!(offsets[0], (-30.0, 0.0));
        assert_eq!(offsets.iter().filter(|(n, _)| *n < 0.0).count(), 6);
    }

    #[test]
    fn test_timestamps_increase() {
        let walk = WalkScenario::at(LONDON).generate();
        assert!(walk.windows(2).all(|w| w[1].timestamp > w[0].timestamp));
    }
}
