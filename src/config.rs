//! Tunable constants for filtering, loop detection and enclosure.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerritoryError};

/// What a capture session does with its live path after a loop is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterCapture {
    /// Drop the whole path; the next fix bootstraps a new one.
    Clear,
    /// Restart the path at the fix that closed the loop.
    #[default]
    KeepLast,
}

/// Configuration for the whole capture pipeline.
///
/// Angular values are in degrees, physical values in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryConfig {
    /// Edge length of one grid cell in degrees.
    /// Default: 0.00006 (~6.7 m of latitude)
    pub grid_size: f64,

    /// Fixes reporting a worse accuracy than this (meters) are dropped once a
    /// path has started. Default: 150.0
    pub accuracy_threshold: f64,

    /// Weight of the newest fix in the exponential moving average.
    /// Default: 0.25
    pub ema_alpha: f64,

    /// Pass fixes through unfiltered (scripted playback).
    /// Default: false
    pub test_mode: bool,

    /// Base Douglas-Peucker tolerance in degrees. Default: 0.00002
    pub rdp_tolerance: f64,

    /// Fraction of `rdp_tolerance` used to clean polygons before enclosure.
    /// Default: 0.25
    pub enclosure_simplify_factor: f64,

    /// Distance to the path start that counts as returning home.
    /// Default: 8.0 meters
    pub snap_to_start_m: f64,

    /// Distance to an earlier path point that counts as closing a loop.
    /// Default: 5.0 meters
    pub proximity_snap_m: f64,

    /// Most recent points, besides the newest fix, that intersection and
    /// proximity search may not close on. Edges touching them are skipped as
    /// well, so the `trailing_buffer` edges before the newest one are never
    /// crossing candidates (the adjacent edge is skipped even at 0).
    /// Default: 3
    pub trailing_buffer: usize,

    /// Minimum loop perimeter. Default: 30.0 meters
    pub min_loop_perimeter_m: f64,

    /// Minimum number of enclosed cells for a capture. Default: 4
    pub min_enclosed_cells: usize,

    /// A loop whose bounding box is narrower than this in both directions is
    /// rejected. Default: 5.0 meters
    pub min_loop_extent_m: f64,

    /// Enclosure gives up on polygons spanning more grid rows than this.
    /// Default: 1000
    pub max_scan_rows: usize,

    /// Consecutive polygon vertices closer than this (degrees) are merged.
    /// Default: 1e-10
    pub dedup_epsilon: f64,

    /// Session path policy after a capture. Default: `KeepLast`
    pub after_capture: AfterCapture,
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self {
            grid_size: 0.00006,
            accuracy_threshold: 150.0,
            ema_alpha: 0.25,
            test_mode: false,
            rdp_tolerance: 0.00002,
            enclosure_simplify_factor: 0.25,
            snap_to_start_m: 8.0,
            proximity_snap_m: 5.0,
            trailing_buffer: 3,
            min_loop_perimeter_m: 30.0,
            min_enclosed_cells: 4,
            min_loop_extent_m: 5.0,
            max_scan_rows: 1000,
            dedup_epsilon: 1e-10,
            after_capture: AfterCapture::KeepLast,
        }
    }
}

impl TerritoryConfig {
    /// Config for deterministic scripted playback: same tolerances, no filtering.
    pub fn test_mode() -> Self {
        Self {
            test_mode: true,
            ..Self::default()
        }
    }

    /// Tolerance used to re-simplify polygons before enclosure.
    pub fn enclosure_tolerance(&self) -> f64 {
        self.rdp_tolerance * self.enclosure_simplify_factor
    }

    /// Check that every value is usable.
    ///
    /// The geometry functions assume a validated config and do not re-check.
    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<()> {
            Err(TerritoryError::InvalidConfig {
                field,
                reason: reason.into(),
            })
        }

        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return invalid("grid_size", format!("must be positive, got {}", self.grid_size));
        }
        if !(self.ema_alpha > 0.0 && self.ema_alpha <= 1.0) {
            return invalid("ema_alpha", format!("must be in (0, 1], got {}", self.ema_alpha));
        }
        if !(self.accuracy_threshold > 0.0) {
            return invalid("accuracy_threshold", "must be positive");
        }
        if !(self.rdp_tolerance >= 0.0 && self.enclosure_simplify_factor >= 0.0) {
            return invalid("rdp_tolerance", "tolerances must be non-negative");
        }
        if self.enclosure_tolerance() >= self.grid_size {
            return invalid(
                "enclosure_simplify_factor",
                "enclosure tolerance must be finer than one grid cell",
            );
        }
        if self.snap_to_start_m < 0.0 || self.proximity_snap_m < 0.0 {
            return invalid("snap_to_start_m", "snap tolerances must be non-negative");
        }
        if self.max_scan_rows == 0 {
            return invalid("max_scan_rows", "must be at least 1");
        }
        if !(self.dedup_epsilon >= 0.0) {
            return invalid("dedup_epsilon", "must be non-negative");
        }
        Ok(())
    }
}
