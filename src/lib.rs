//! # Turfwalk
//!
//! Geometry engine for location-based territory capture games.
//!
//! A player's walking path is recorded as a sequence of GPS fixes. When the
//! path closes on itself, the enclosed area is converted into owned grid
//! cells. This library provides:
//! - Fix filtering (accuracy gate + exponential smoothing)
//! - Douglas-Peucker path simplification
//! - Closed-loop detection (snap-to-start, self-intersection, proximity snap)
//! - Scanline polygon-to-grid enclosure
//! - A capture session that runs the whole pipeline per fix
//!
//! ## Features
//!
//! - **`parallel`** - Replay many independent tracks concurrently with rayon
//! - **`synthetic`** - Seeded synthetic walk generator for tests and benches
//! - **`cli`** - The `turfwalk-cli` GPX replay tool
//!
//! ## Quick Start
//!
//! ```rust
//! use turfwalk::{CaptureSession, FixOutcome, GpsPoint};
//!
//! let mut session = CaptureSession::new();
//! let fix = GpsPoint::with_accuracy(51.5074, -0.1278, 5.0, 0);
//! match session.push_fix(fix) {
//!     FixOutcome::Captured(result) => println!("captured {} cells", result.cell_count()),
//!     FixOutcome::Appended | FixOutcome::Rejected => {}
//! }
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, TerritoryError};

// Tunables shared by every stage
pub mod config;
pub use config::{AfterCapture, TerritoryConfig};

// Geographic utilities (distance, bounds, segment intersection)
pub mod geo_utils;

// Grid quantization and cell identifiers
pub mod grid;
pub use grid::{CellId, Grid, GridIndex};

// GPS fix filtering
pub mod filter;
pub use filter::FixFilter;

// Douglas-Peucker simplification
pub mod simplify;
pub use simplify::simplify;

// Closed polygons
pub mod polygon;
pub use polygon::Polygon;

// Polygon-to-grid enclosure
pub mod enclosure;
pub use enclosure::{enclosed_cells, enclosed_cells_by_containment};

// Closed loop detection
pub mod loop_detect;
pub use loop_detect::{detect_closed_loop, ClosureKind, LoopDetector, LoopResult};

// Claimed cells with viewport queries
pub mod territory;
pub use territory::Territory;

// Per-player capture pipeline
pub mod session;
pub use session::{CaptureSession, FixOutcome};

// Track replay
pub mod replay;
pub use replay::{replay_track, ReplaySummary};
#[cfg(feature = "parallel")]
pub use replay::replay_tracks_parallel;

// Synthetic walk generation (test and benchmark data)
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS fix: coordinate plus optional horizontal accuracy and a timestamp.
///
/// # Example
/// ```
/// use turfwalk::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// assert!(point.accuracy.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in meters, if the sensor reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Fix time in milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: i64,
}

impl GpsPoint {
    /// Create a point with no accuracy and a zero timestamp.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp: 0,
        }
    }

    /// Create a point carrying a sensor accuracy and timestamp.
    pub fn with_accuracy(latitude: f64, longitude: f64, accuracy: f64, timestamp: i64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: Some(accuracy),
            timestamp,
        }
    }

    /// Same point with a different timestamp.
    pub fn at(self, timestamp: i64) -> Self {
        Self { timestamp, ..self }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Bounding box of a set of points, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// East-west extent in meters, measured along the middle latitude.
    pub fn width_meters(&self) -> f64 {
        let mid = (self.min_lat + self.max_lat) / 2.0;
        geo_utils::haversine_distance(
            &GpsPoint::new(mid, self.min_lng),
            &GpsPoint::new(mid, self.max_lng),
        )
    }

    /// North-south extent in meters.
    pub fn height_meters(&self) -> f64 {
        geo_utils::haversine_distance(
            &GpsPoint::new(self.min_lat, self.min_lng),
            &GpsPoint::new(self.max_lat, self.min_lng),
        )
    }
}
